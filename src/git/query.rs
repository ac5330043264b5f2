// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git queries with gix first and the git CLI as fallback.
//!
//! ```text
//! head_commit(path)
//!   not a checkout     --> None
//!   GixBackend ok      --> commit
//!   GixBackend error   --> ShellBackend --> commit | None
//! ```

use std::path::Path;

use tracing::debug;

use super::backend::{GitQuery, GixBackend, ShellBackend};

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    GixBackend::is_git_repo(path)
}

/// Commit hash of HEAD, or `None` outside a checkout or before the first commit.
#[must_use]
pub fn head_commit(path: &Path) -> Option<String> {
    if !is_git_repo(path) {
        debug!(path = %path.display(), "not a git checkout, no commit hash");
        return None;
    }

    match GixBackend::head_commit(path) {
        Ok(commit) => commit,
        Err(e) => {
            debug!(error = %e, "gix could not read HEAD, falling back to git CLI");
            ShellBackend::head_commit(path).ok().flatten()
        }
    }
}
