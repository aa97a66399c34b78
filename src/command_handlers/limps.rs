use anyhow::Result;

use super::Context;
use crate::cli::LimpsAction;
use crate::runner::CommandSpec;

pub const PROJECT: &str = "9xdSq-LIMPS-FemTO-R1C";

pub fn run_limps(action: LimpsAction, ctx: &mut Context) -> Result<()> {
    match action {
        LimpsAction::Run => {
            let spec = CommandSpec::new("python", ["main.py", "--mode", "workflow", "--gpu"])
                .env("PYTHONUNBUFFERED", "1");
            ctx.exec_in_repo(PROJECT, &spec)?;
        }
        // The workflow exposes no health endpoint yet.
        LimpsAction::Health => println!("LIMPS health: (stub) ok"),
    }
    Ok(())
}
