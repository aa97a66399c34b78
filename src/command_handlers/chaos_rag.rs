use anyhow::{Context as _, Result};
use fs_err as fs;

use super::Context;
use crate::cli::ChaosRagAction;
use crate::runner::CommandSpec;

pub const PROJECT: &str = "TEmp-oral_vectraxice";
pub const ROUTE_INPUT_FILE: &str = ".kiln_tmp_input.txt";
pub const USAGE: &str = "Usage: kiln chaos-rag [train|route] < file.txt";

pub fn run_chaos_rag(action: Option<ChaosRagAction>, ctx: &mut Context) -> Result<()> {
    let spec = match action {
        // The script name really contains a space; it is one argument.
        Some(ChaosRagAction::Train) => {
            CommandSpec::new("python", ["sweet integrated_training_system.py"])
        }
        Some(ChaosRagAction::Route) => {
            let input = ctx.read_stdin()?;
            let tmp = ctx.cwd.join(ROUTE_INPUT_FILE);
            fs::write(&tmp, &input).context("staging chaos-rag input")?;
            CommandSpec::new(
                "python",
                [
                    "ta_uls_llm.py".to_string(),
                    "--in".to_string(),
                    tmp.to_string_lossy().into_owned(),
                ],
            )
        }
        None => {
            println!("{USAGE}");
            return Ok(());
        }
    };
    ctx.exec_in_repo(PROJECT, &spec)?;
    Ok(())
}
