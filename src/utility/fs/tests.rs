// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::walk::{parallel_walk, tree_files};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[test]
fn test_parallel_walk() {
    let temp = temp_dir();
    std::fs::create_dir(temp.path().join("subdir")).unwrap();
    std::fs::write(temp.path().join("file1.txt"), "").unwrap();
    std::fs::write(temp.path().join("subdir/file2.txt"), "").unwrap();

    let result = parallel_walk(temp.path()).unwrap();

    assert_eq!(result.files().len(), 2);
    assert!(result.files()[0].ends_with("file1.txt"));
    assert_eq!(result.error_count(), 0);
}

#[test]
fn test_parallel_walk_missing_root() {
    let temp = temp_dir();
    assert!(parallel_walk(temp.path().join("absent")).is_err());
}

#[test]
fn test_tree_files_sorted_and_relative() {
    let temp = temp_dir();
    std::fs::create_dir_all(temp.path().join("com/example")).unwrap();
    std::fs::write(temp.path().join("z.txt"), "z").unwrap();
    std::fs::write(temp.path().join("com/example/Main.class"), "c").unwrap();
    std::fs::write(temp.path().join("a.txt"), "a").unwrap();

    let files = tree_files(temp.path()).unwrap();
    let names: Vec<_> = files.iter().map(|f| f.relative.as_str()).collect();
    assert_eq!(names, ["a.txt", "com/example/Main.class", "z.txt"]);
    assert!(files.iter().all(|f| f.path.starts_with(temp.path())));
}

#[test]
fn test_tree_files_includes_hidden_and_ignored() {
    let temp = temp_dir();
    std::fs::write(temp.path().join(".gitignore"), "*.log\n").unwrap();
    std::fs::write(temp.path().join("debug.log"), "").unwrap();
    std::fs::write(temp.path().join(".hidden"), "").unwrap();

    let files = tree_files(temp.path()).unwrap();
    let names: Vec<_> = files.iter().map(|f| f.relative.as_str()).collect();
    assert_eq!(names, [".gitignore", ".hidden", "debug.log"]);
}

#[test]
fn test_tree_files_missing_root_is_empty() {
    let temp = temp_dir();
    assert!(tree_files(temp.path().join("absent")).unwrap().is_empty());
}
