#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Scratch layout: `<root>/work` is the cwd, projects live in `<root>`,
/// fake tools in `<root>/bin`.
pub struct Workspace {
    pub root: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(root.path().join("work")).unwrap();
        fs::create_dir_all(root.path().join("bin")).unwrap();
        Self { root }
    }

    pub fn cwd(&self) -> PathBuf {
        self.root.path().join("work")
    }

    pub fn project(&self, name: &str) -> PathBuf {
        let p = self.root.path().join(name);
        fs::create_dir_all(&p).unwrap();
        p
    }

    /// Install an executable shell script called `name` ahead of the real PATH.
    #[cfg(unix)]
    pub fn fake_tool(&self, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = self.root.path().join("bin").join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn kiln(&self, args: &[&str], stdin: &[u8]) -> Output {
        self.kiln_with_env(args, stdin, &[])
    }

    pub fn kiln_with_env(&self, args: &[&str], stdin: &[u8], envs: &[(&str, &str)]) -> Output {
        let path = std::env::var_os("PATH").unwrap_or_default();
        let mut dirs = vec![self.root.path().join("bin")];
        dirs.extend(std::env::split_paths(&path));
        let mut child = Command::new(env!("CARGO_BIN_EXE_kiln"))
            .args(args)
            .current_dir(self.cwd())
            .env("PATH", std::env::join_paths(dirs).unwrap())
            .env_remove("KILN_HOST")
            .env_remove("KILN_PORT")
            .env_remove("KILN_LOG")
            .env_remove("HTTP_PROXY")
            .env_remove("http_proxy")
            .env_remove("ALL_PROXY")
            .env_remove("all_proxy")
            .envs(envs.iter().copied())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to start kiln");
        child.stdin.take().unwrap().write_all(stdin).unwrap();
        child.wait_with_output().expect("failed to wait for kiln")
    }
}

pub fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

pub fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

pub fn describe(out: &Output) -> String {
    format!(
        "status {:?}\nstdout:\n{}\nstderr:\n{}",
        out.status.code(),
        stdout(out),
        stderr(out)
    )
}
