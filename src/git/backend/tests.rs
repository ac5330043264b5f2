// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{GitQuery, GixBackend, ShellBackend};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn commit_empty(path: &std::path::Path) {
    ShellBackend::git_command(
        &[
            "-c",
            "user.name=modpipe",
            "-c",
            "user.email=modpipe@example.invalid",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "--allow-empty",
            "--quiet",
            "-m",
            "init",
        ],
        path,
    )
    .expect("failed to commit");
}

#[test]
fn test_gix_backend_is_git_repo() {
    let temp = temp_dir();
    assert!(!GixBackend::is_git_repo(temp.path()));

    gix::init(temp.path()).expect("failed to init repo");
    assert!(GixBackend::is_git_repo(temp.path()));
}

#[test]
fn test_head_commit_outside_checkout_is_error() {
    let temp = temp_dir();
    assert!(GixBackend::head_commit(temp.path()).is_err());
    assert!(ShellBackend::head_commit(temp.path()).is_err());
}

#[test]
fn test_head_commit_unborn_is_none() {
    let temp = temp_dir();
    gix::init(temp.path()).expect("failed to init repo");

    assert_eq!(GixBackend::head_commit(temp.path()).expect("query"), None);
    assert_eq!(ShellBackend::head_commit(temp.path()).expect("query"), None);
}

#[test]
fn test_backends_agree_on_head_commit() {
    let temp = temp_dir();
    gix::init(temp.path()).expect("failed to init repo");
    commit_empty(temp.path());

    let gix_commit = GixBackend::head_commit(temp.path())
        .expect("gix query")
        .expect("commit exists");
    let shell_commit = ShellBackend::head_commit(temp.path())
        .expect("shell query")
        .expect("commit exists");

    assert_eq!(gix_commit, shell_commit);
    assert_eq!(gix_commit.len(), 40);
}
