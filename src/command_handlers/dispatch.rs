use std::ffi::OsString;
use std::path::Path;

use anyhow::Result;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;

use super::optimize::OptimizeArgs;
use super::{chaos_rag, enjoypy, eopiez, limp, limps, optimize, Context};
use crate::cli::{Cli, Commands, USAGE};
use crate::config::{KilnConfig, DEFAULT_CONFIG_PATH};
use crate::errors::{display_for, KilnError, FAILURE_EXIT_CODE};
use crate::logging;

/// Parse `argv` (program name first), run the selected command and return
/// the process exit code.
pub fn run_argv<I, T>(argv: I, ctx: &mut Context) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) => return parse_failure(e),
    };
    logging::init(cli.verbose);
    let config_path = ctx
        .cwd
        .join(cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));
    match dispatch(cli.command, &config_path, ctx) {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}", display_for(&e));
            FAILURE_EXIT_CODE
        }
    }
}

pub fn dispatch(cmd: Commands, config_path: &Path, ctx: &mut Context) -> Result<()> {
    match cmd {
        Commands::Optimize {
            json,
            method,
            host,
            port,
            target_entropy,
        } => {
            let cfg = KilnConfig::load(config_path)?;
            let args = OptimizeArgs {
                json,
                method,
                host,
                port,
                target_entropy,
            };
            optimize::run_optimize(args, &cfg, ctx)
        }
        Commands::Limps { action } => limps::run_limps(action.unwrap_or_default(), ctx),
        Commands::ChaosRag { action } => chaos_rag::run_chaos_rag(action, ctx),
        Commands::Limp { action } => limp::run_limp(action.unwrap_or_default(), ctx),
        Commands::Eopiez => eopiez::run_eopiez(ctx),
        Commands::EnjoyPy { args } => enjoypy::run_enjoypy(&args, ctx),
    }
}

fn parse_failure(e: clap::Error) -> u8 {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            0
        }
        ErrorKind::InvalidSubcommand
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let name = match e.get(ContextKind::InvalidSubcommand) {
                Some(ContextValue::String(s)) => Some(s.clone()),
                _ => None,
            };
            if name.is_some() {
                eprintln!("{}", KilnError::UnknownSubcommand(name));
            }
            println!("{USAGE}");
            FAILURE_EXIT_CODE
        }
        _ => {
            let _ = e.print();
            FAILURE_EXIT_CODE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_handlers::spy::SpyLauncher;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;

    struct Sandbox {
        _root: tempfile::TempDir,
        cwd: PathBuf,
    }

    /// `<tmp>/work` as cwd, with every known project next to it in `<tmp>`.
    fn sandbox() -> Sandbox {
        let root = tempfile::tempdir().unwrap();
        let cwd = root.path().join("work");
        fs::create_dir_all(&cwd).unwrap();
        for p in [
            limps::PROJECT,
            chaos_rag::PROJECT,
            limp::PROJECT,
            eopiez::PROJECT,
            enjoypy::PROJECT,
        ] {
            fs::create_dir_all(root.path().join(p)).unwrap();
        }
        Sandbox { _root: root, cwd }
    }

    fn run(spy: &SpyLauncher, cwd: &Path, stdin: &[u8], args: &[&str]) -> u8 {
        let mut input = Cursor::new(stdin.to_vec());
        let mut ctx = Context {
            launcher: spy,
            cwd: cwd.to_path_buf(),
            stdin: &mut input,
        };
        run_argv(std::iter::once("kiln").chain(args.iter().copied()), &mut ctx)
    }

    fn project_of(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }

    #[test]
    fn each_command_routes_to_its_project() {
        let sb = sandbox();
        let cases: &[(&[&str], &str, &str)] = &[
            (&["limps"], limps::PROJECT, "python main.py --mode workflow --gpu"),
            (&["limps", "run"], limps::PROJECT, "python main.py --mode workflow --gpu"),
            (
                &["chaos-rag", "train"],
                chaos_rag::PROJECT,
                "python sweet integrated_training_system.py",
            ),
            (&["limp"], limp::PROJECT, "npm run dev"),
            (&["limp", "start"], limp::PROJECT, "npm run dev"),
            (&["limp", "build"], limp::PROJECT, "npm run build"),
            (&["enjoypy", "--mode", "fast"], enjoypy::PROJECT, "python enjoy.py --mode fast"),
        ];
        for (args, project, line) in cases {
            let spy = SpyLauncher::default();
            assert_eq!(run(&spy, &sb.cwd, b"", args), 0, "{args:?}");
            let (dir, spec) = spy.only_call();
            assert_eq!(project_of(&dir), *project, "{args:?}");
            assert_eq!(spec.display_line(), *line, "{args:?}");
        }
    }

    #[test]
    fn chaos_rag_train_script_is_one_argument() {
        let sb = sandbox();
        let spy = SpyLauncher::default();
        assert_eq!(run(&spy, &sb.cwd, b"", &["chaos-rag", "train"]), 0);
        let (_, spec) = spy.only_call();
        assert_eq!(spec.program(), "python");
        assert_eq!(spec.args(), ["sweet integrated_training_system.py"]);
    }

    #[test]
    fn limps_run_sets_unbuffered_python() {
        let sb = sandbox();
        let spy = SpyLauncher::default();
        run(&spy, &sb.cwd, b"", &["limps"]);
        let (_, spec) = spy.only_call();
        assert_eq!(
            spec.env_overrides().get("PYTHONUNBUFFERED").map(String::as_str),
            Some("1")
        );
        assert_eq!(spec.input(), None);
    }

    #[test]
    fn limps_health_launches_nothing() {
        let sb = sandbox();
        let spy = SpyLauncher::default();
        assert_eq!(run(&spy, &sb.cwd, b"", &["limps", "health"]), 0);
        assert_eq!(spy.launches(), 0);
    }

    #[test]
    fn chaos_rag_without_action_prints_usage_only() {
        let sb = sandbox();
        let spy = SpyLauncher::default();
        assert_eq!(run(&spy, &sb.cwd, b"", &["chaos-rag"]), 0);
        assert_eq!(spy.launches(), 0);
    }

    #[test]
    fn chaos_rag_route_stages_stdin_in_a_file() {
        let sb = sandbox();
        let spy = SpyLauncher::default();
        assert_eq!(run(&spy, &sb.cwd, b"route me\n", &["chaos-rag", "route"]), 0);
        let (dir, spec) = spy.only_call();
        assert_eq!(project_of(&dir), chaos_rag::PROJECT);
        let staged = sb.cwd.join(chaos_rag::ROUTE_INPUT_FILE);
        assert_eq!(fs::read(&staged).unwrap(), b"route me\n");
        assert_eq!(
            spec.args(),
            [
                "ta_uls_llm.py".to_string(),
                "--in".to_string(),
                staged.to_string_lossy().into_owned()
            ]
        );
    }

    #[test]
    fn eopiez_feeds_stdin_verbatim() {
        let sb = sandbox();
        let spy = SpyLauncher::default();
        assert_eq!(run(&spy, &sb.cwd, br#"{"x":1}"#, &["eopiez"]), 0);
        let (dir, spec) = spy.only_call();
        assert_eq!(project_of(&dir), eopiez::PROJECT);
        assert_eq!(spec.program(), "julia");
        assert_eq!(spec.args()[0], "--project=.");
        assert_eq!(spec.input(), Some(&br#"{"x":1}"#[..]));
    }

    #[test]
    fn unknown_or_missing_command_exits_one_without_launching() {
        let sb = sandbox();
        for args in [&["bake"][..], &[][..]] {
            let spy = SpyLauncher::default();
            assert_eq!(run(&spy, &sb.cwd, b"", args), 1, "{args:?}");
            assert_eq!(spy.launches(), 0);
        }
    }

    #[test]
    fn unknown_action_exits_one() {
        let sb = sandbox();
        let spy = SpyLauncher::default();
        assert_eq!(run(&spy, &sb.cwd, b"", &["limp", "deploy"]), 1);
        assert_eq!(run(&spy, &sb.cwd, b"", &["chaos-rag", "dance"]), 1);
        assert_eq!(spy.launches(), 0);
    }

    #[test]
    fn missing_project_never_launches() {
        let root = tempfile::tempdir().unwrap();
        let cwd = root.path().join("work");
        fs::create_dir_all(&cwd).unwrap();
        let spy = SpyLauncher::default();
        assert_eq!(run(&spy, &cwd, br#"{"x":1}"#, &["eopiez"]), 1);
        assert_eq!(spy.launches(), 0);
    }

    #[test]
    fn failing_child_maps_to_exit_one() {
        let sb = sandbox();
        let spy = SpyLauncher {
            exit_code: 3,
            ..Default::default()
        };
        assert_eq!(run(&spy, &sb.cwd, b"", &["limp", "build"]), 1);
        assert_eq!(spy.launches(), 1);
    }

    #[test]
    fn optimize_requires_existing_json_file() {
        let sb = sandbox();
        for args in [&["optimize"][..], &["optimize", "--json", "absent.json"][..]] {
            let spy = SpyLauncher::default();
            assert_eq!(run(&spy, &sb.cwd, b"", args), 1, "{args:?}");
            assert_eq!(spy.launches(), 0);
        }
    }
}
