// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery --> GixBackend   (pure Rust gix)
//!          --> ShellBackend (git CLI)
//! ```

use crate::error::{GitError, PipeResult};
use std::path::Path;

/// Read-only git query operations.
pub trait GitQuery {
    /// Check if path is inside a git work tree.
    fn is_git_repo(path: &Path) -> bool;

    /// Full hex id of the commit HEAD points to.
    ///
    /// `Ok(None)` for a repository without commits.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn head_commit(path: &Path) -> PipeResult<Option<String>>;
}

/// Pure Rust git backend using gix.
pub struct GixBackend;

impl GixBackend {
    fn open(path: &Path) -> PipeResult<gix::Repository> {
        gix::discover(path).map_err(|e| {
            GitError::RepoNotFound {
                path: format!("{} ({e})", path.display()),
            }
            .into()
        })
    }
}

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::discover(path).is_ok()
    }

    fn head_commit(path: &Path) -> PipeResult<Option<String>> {
        let repo = Self::open(path)?;
        let head = repo.head().map_err(|e| GitError::Gix(e.to_string()))?;
        Ok(head.id().map(|id| id.to_string()))
    }
}

/// Shell-based git backend using the git CLI.
///
/// Used when gix cannot read a repository, e.g. with extensions it does not
/// support yet.
pub struct ShellBackend;

impl ShellBackend {
    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> PipeResult<String> {
        use std::process::Command;

        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")))?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitQuery for ShellBackend {
    fn is_git_repo(path: &Path) -> bool {
        Self::git_command(&["rev-parse", "--is-inside-work-tree"], path).is_ok()
    }

    fn head_commit(path: &Path) -> PipeResult<Option<String>> {
        if !Self::is_git_repo(path) {
            return Err(GitError::RepoNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        // Fails only on an unborn HEAD once the work tree check passed.
        Ok(Self::git_command(&["rev-parse", "--verify", "--quiet", "HEAD"], path).ok())
    }
}

#[cfg(test)]
mod tests;
