use std::io;
use std::process::ExitCode;

use kiln::command_handlers::{dispatch, Context};
use kiln::errors::FAILURE_EXIT_CODE;
use kiln::runner::SystemLauncher;

fn main() -> ExitCode {
    let cwd = match std::env::current_dir() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("kiln: cannot read current directory: {e}");
            return ExitCode::from(FAILURE_EXIT_CODE);
        }
    };
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut ctx = Context {
        launcher: &SystemLauncher,
        cwd,
        stdin: &mut input,
    };
    ExitCode::from(dispatch::run_argv(std::env::args_os(), &mut ctx))
}
