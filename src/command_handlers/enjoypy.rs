use anyhow::Result;

use super::Context;
use crate::runner::CommandSpec;

pub const PROJECT: &str = "enjoypy";

pub fn run_enjoypy(args: &[String], ctx: &mut Context) -> Result<()> {
    let argv = std::iter::once("enjoy.py".to_string()).chain(args.iter().cloned());
    ctx.exec_in_repo(PROJECT, &CommandSpec::new("python", argv))?;
    Ok(())
}
