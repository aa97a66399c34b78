use clap::{Parser, Subcommand, ValueEnum};

use crate::optimize_client::OptimizeMethod;

pub const USAGE: &str = "\
kiln <command> [options]

Commands:
  optimize     Run al-ULS optimization/stability/entropy over HTTP
  limps        Run unified LIMPS workflow (Python)
  chaos-rag    Invoke TEmp-oral_vectraxice chaos RAG / training
  limp         Start/build the LiMp (TypeScript) service
  eopiez       Run Julia snippet from Eopiez with JSON IO
  enjoypy      Execute helper utilities from enjoypy

Try `kiln <command> --help`";

#[derive(Parser, Debug)]
#[command(
    version,
    name = "kiln",
    about = "kiln: run sibling-project tools and the al-ULS optimizer from one CLI",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config (defaults to ./kiln.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log kiln internals at debug level (KILN_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run al-ULS optimization/stability/entropy over HTTP
    Optimize {
        /// JSON file with {"matrix": [[...], [...]]}
        #[arg(long, value_name = "PATH")]
        json: Option<String>,
        #[arg(long, value_enum)]
        method: Option<OptimizeMethod>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long = "target-entropy", value_name = "F")]
        target_entropy: Option<f64>,
    },
    /// Run unified LIMPS workflow (Python)
    Limps {
        #[arg(value_enum)]
        action: Option<LimpsAction>,
    },
    /// Invoke TEmp-oral_vectraxice chaos RAG / training
    ChaosRag {
        #[arg(value_enum)]
        action: Option<ChaosRagAction>,
    },
    /// Start/build the LiMp (TypeScript) service
    Limp {
        #[arg(value_enum)]
        action: Option<LimpAction>,
    },
    /// Run Julia snippet from Eopiez with JSON on stdin
    Eopiez,
    /// Execute helper utilities from enjoypy; arguments are passed through
    #[command(name = "enjoypy", disable_help_flag = true)]
    EnjoyPy {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum LimpsAction {
    #[default]
    Run,
    Health,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ChaosRagAction {
    Train,
    Route,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum LimpAction {
    #[default]
    Start,
    Build,
}
