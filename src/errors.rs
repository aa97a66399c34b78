use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every way a kiln invocation can fail. All of them abort the invocation.
#[derive(Debug, Error)]
pub enum KilnError {
    #[error("{0}")]
    InputValidation(String),
    #[error("Repo {name} not found near {}", .cwd.display())]
    RepoNotFound { name: String, cwd: PathBuf },
    #[error("[kiln] failed to start {program}: {source}")]
    ProcessLaunch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("[kiln] command failed ({code})")]
    ProcessExecution { code: i32 },
    #[error("unknown command{}", .0.as_deref().map(|c| format!(" '{c}'")).unwrap_or_default())]
    UnknownSubcommand(Option<String>),
    #[error("optimize request failed: {0}")]
    Http(String),
    #[error("config: {0}")]
    Config(String),
}

impl KilnError {
    pub fn input(msg: impl Into<String>) -> Self {
        KilnError::InputValidation(msg.into())
    }
}

/// Exit status for any failed invocation, whatever the failure class.
pub const FAILURE_EXIT_CODE: u8 = 1;

/// Single diagnostic line for the exit boundary.
pub fn display_for(err: &anyhow::Error) -> String {
    match err.downcast_ref::<KilnError>() {
        Some(e) => e.to_string(),
        None => format!("{err:#}"),
    }
}
