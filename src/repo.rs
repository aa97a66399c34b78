use std::path::{Path, PathBuf};

use crate::errors::KilnError;

/// Absolute directory that existed when it was resolved. Only the resolver
/// hands these out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation(PathBuf);

impl ResolvedLocation {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Where a project named `name` may live, in precedence order:
/// `<cwd>/<name>` then `<cwd>/../<name>`.
pub fn candidates(cwd: &Path, name: &str) -> [PathBuf; 2] {
    let parent = cwd.parent().unwrap_or(cwd);
    [cwd.join(name), parent.join(name)]
}

/// Locate project `name` beside `cwd`. Only the two [`candidates`] are
/// checked; there is no deeper or configured search.
pub fn resolve_from(cwd: &Path, name: &str) -> Result<ResolvedLocation, KilnError> {
    if name.is_empty() {
        return Err(KilnError::input("project name must not be empty"));
    }
    let cwd = absolute(cwd);
    for candidate in candidates(&cwd, name) {
        tracing::debug!(candidate = %candidate.display(), "checking project directory");
        if candidate.is_dir() {
            return Ok(ResolvedLocation(candidate));
        }
    }
    Err(KilnError::RepoNotFound {
        name: name.to_string(),
        cwd,
    })
}

fn absolute(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    std::env::current_dir()
        .map(|base| base.join(dir))
        .unwrap_or_else(|_| dir.to_path_buf())
}
