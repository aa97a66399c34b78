use anyhow::Result;

use super::Context;
use crate::cli::LimpAction;
use crate::runner::CommandSpec;

pub const PROJECT: &str = "LiMp";

pub fn run_limp(action: LimpAction, ctx: &mut Context) -> Result<()> {
    let script = match action {
        LimpAction::Start => "dev",
        LimpAction::Build => "build",
    };
    ctx.exec_in_repo(PROJECT, &CommandSpec::new("npm", ["run", script]))?;
    Ok(())
}
