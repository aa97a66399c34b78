pub mod chaos_rag;
pub mod dispatch;
pub mod enjoypy;
pub mod eopiez;
pub mod limp;
pub mod limps;
pub mod optimize;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::runner::{self, CommandSpec, Launcher, ProcessOutcome};

/// What a handler needs from the outside world.
pub struct Context<'a> {
    pub launcher: &'a dyn Launcher,
    /// Root for project lookup and relative paths.
    pub cwd: PathBuf,
    pub stdin: &'a mut dyn Read,
}

impl Context<'_> {
    pub fn exec_in_repo(&self, project: &str, spec: &CommandSpec) -> Result<ProcessOutcome> {
        Ok(runner::exec_in_repo(self.launcher, &self.cwd, project, spec)?)
    }

    pub fn read_stdin(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.stdin
            .read_to_end(&mut buf)
            .context("reading standard input")?;
        Ok(buf)
    }
}
