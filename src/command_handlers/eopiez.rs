use anyhow::Result;

use super::Context;
use crate::runner::CommandSpec;

pub const PROJECT: &str = "Eopiez";

/// Reads JSON from stdin and answers with the parsed value wrapped in an
/// acknowledgement object.
pub const EVAL_SCRIPT: &str = r#"using JSON
s = read(stdin, String)
data = JSON.parse(s)
println(JSON.json(Dict("received"=>data, "ok"=>true)))
"#;

/// Pipe this process's stdin, untouched, into a Julia snippet run inside
/// the Eopiez project environment.
pub fn run_eopiez(ctx: &mut Context) -> Result<()> {
    let input = ctx.read_stdin()?;
    tracing::debug!(bytes = input.len(), "forwarding stdin to julia");
    let spec = CommandSpec::new("julia", ["--project=.", "-e", EVAL_SCRIPT]).stdin(input);
    ctx.exec_in_repo(PROJECT, &spec)?;
    Ok(())
}
