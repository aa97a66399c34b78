use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{ChildStdin, Command, ExitStatus, Stdio};
use std::thread;

use crate::errors::KilnError;
use crate::repo::{self, ResolvedLocation};

/// One external command: program, argv, env overrides and optional stdin bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    stdin: Option<Vec<u8>>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: BTreeMap::new(),
            stdin: None,
        }
    }

    /// Add an environment override; it wins over the inherited value.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn stdin(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(bytes.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env_overrides(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn input(&self) -> Option<&[u8]> {
        self.stdin.as_deref()
    }

    pub fn display_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Termination status of a finished child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    code: i32,
}

impl ProcessOutcome {
    pub fn from_code(code: i32) -> Self {
        Self { code }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Seam between the dispatcher and the operating system.
pub trait Launcher {
    fn launch(
        &self,
        location: &ResolvedLocation,
        spec: &CommandSpec,
    ) -> Result<ProcessOutcome, KilnError>;
}

/// Launches real processes and relays them to this process's stdout/stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(
        &self,
        location: &ResolvedLocation,
        spec: &CommandSpec,
    ) -> Result<ProcessOutcome, KilnError> {
        run(location, spec)
    }
}

/// Resolve `name` relative to `cwd` and launch `spec` inside it.
/// Nothing is launched when resolution fails.
pub fn exec_in_repo(
    launcher: &dyn Launcher,
    cwd: &Path,
    name: &str,
    spec: &CommandSpec,
) -> Result<ProcessOutcome, KilnError> {
    let location = repo::resolve_from(cwd, name)?;
    launcher.launch(&location, spec)
}

/// Announce, launch and relay `spec` inside `location` using the real
/// standard streams.
pub fn run(location: &ResolvedLocation, spec: &CommandSpec) -> Result<ProcessOutcome, KilnError> {
    let announced = writeln!(
        io::stdout().lock(),
        "[kiln] cd {} && {}",
        location,
        spec.display_line()
    );
    if let Err(e) = announced {
        tracing::warn!(error = %e, "could not print command line");
    }
    run_with_sinks(location, spec, io::stdout(), io::stderr())
}

/// Launch `spec` inside `location`, forwarding the child's stdout lines to
/// `out` and stderr lines to `err`.
///
/// Stdin feeding, both relays and the wait for termination run at the same
/// time. All three helper threads are joined before this returns, so every
/// line the child produced has been forwarded by then. A non-zero exit is
/// reported as [`KilnError::ProcessExecution`].
pub fn run_with_sinks<O, E>(
    location: &ResolvedLocation,
    spec: &CommandSpec,
    out: O,
    err: E,
) -> Result<ProcessOutcome, KilnError>
where
    O: Write + Send,
    E: Write + Send,
{
    let mut child = Command::new(spec.program())
        .args(spec.args())
        .current_dir(location.path())
        .envs(spec.env_overrides())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| KilnError::ProcessLaunch {
            program: spec.program().to_string(),
            source,
        })?;
    tracing::debug!(
        pid = child.id(),
        dir = %location,
        program = spec.program(),
        "spawned child"
    );

    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let input = spec.input();

    let status = thread::scope(|s| {
        let feeder = s.spawn(move || feed_stdin(stdin, input));
        let out_relay = s.spawn(move || relay_lines(stdout, out, "stdout"));
        let err_relay = s.spawn(move || relay_lines(stderr, err, "stderr"));

        let status = child.wait();

        match feeder.join() {
            Ok(Ok(n)) => tracing::debug!(bytes = n, "stdin delivered"),
            Ok(Err(e)) => tracing::warn!(error = %e, "writing child stdin failed"),
            Err(_) => tracing::warn!("stdin feeder panicked"),
        }
        for (stream, relay) in [("stdout", out_relay), ("stderr", err_relay)] {
            match relay.join() {
                Ok(Ok(lines)) => tracing::debug!(stream, lines, "relay drained"),
                Ok(Err(e)) => tracing::warn!(stream, error = %e, "relay stopped early"),
                Err(_) => tracing::warn!(stream, "relay panicked"),
            }
        }
        status
    })
    .map_err(|source| KilnError::ProcessLaunch {
        program: spec.program().to_string(),
        source,
    })?;

    let outcome = ProcessOutcome::from_code(exit_code(status));
    tracing::debug!(code = outcome.code, "child exited");
    if outcome.success() {
        Ok(outcome)
    } else {
        Err(KilnError::ProcessExecution { code: outcome.code })
    }
}

/// Write `input` and close the pipe. With no (or empty) input the pipe is
/// closed straight away.
fn feed_stdin(pipe: Option<ChildStdin>, input: Option<&[u8]>) -> io::Result<usize> {
    let Some(mut pipe) = pipe else {
        return Ok(0);
    };
    let Some(bytes) = input.filter(|b| !b.is_empty()) else {
        return Ok(0);
    };
    match pipe.write_all(bytes) {
        Ok(()) => Ok(bytes.len()),
        // child exited without reading everything
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("child closed stdin early");
            Ok(0)
        }
        Err(e) => Err(e),
    }
}

/// Copy `src` to `sink` one line at a time, bytes untouched. Keeps reading
/// after the sink fails so the child never blocks on a full pipe.
fn relay_lines<R: Read, W: Write>(src: Option<R>, mut sink: W, stream: &str) -> io::Result<u64> {
    let Some(src) = src else {
        return Ok(0);
    };
    let mut reader = BufReader::new(src);
    let mut line = Vec::new();
    let mut lines = 0u64;
    let mut sink_ok = true;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        lines += 1;
        if sink_ok {
            if let Err(e) = sink.write_all(&line).and_then(|_| sink.flush()) {
                tracing::warn!(stream, error = %e, "discarding further child output");
                sink_ok = false;
            }
        }
    }
    Ok(lines)
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
