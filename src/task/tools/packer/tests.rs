// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::PackerTool;
use crate::config::Config;
use crate::error::ArchiveError;
use crate::jar::read_archive;
use crate::task::tools::test_utils::run_with_logs;
use crate::task::tools::{Tool, ToolContext};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_packer_tool_builder() {
    let tool = PackerTool::new()
        .module("api")
        .archive("/libs/guithium-api-1.4.0.jar")
        .require_source("/api/classes")
        .add_source("/staging/api")
        .title("guithium-api")
        .version("1.4.0");

    insta::assert_debug_snapshot!(tool, @r#"
    PackerTool {
        module: Some(
            "api",
        ),
        archive: Some(
            "/libs/guithium-api-1.4.0.jar",
        ),
        sources: [
            "/api/classes",
            "/staging/api",
        ],
        required: [
            "/api/classes",
        ],
        title: Some(
            "guithium-api",
        ),
        version: Some(
            "1.4.0",
        ),
    }
    "#);
}

#[test]
fn test_pack_without_archive_fails() {
    assert!(PackerTool::new().pack().is_err());
}

#[test]
fn test_pack_classes_and_resources() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "classes/dev/guithium/Api.class", "bytecode");
    write(temp.path(), "classes/shared.txt", "from classes");
    write(temp.path(), "staging/shared.txt", "from resources");
    write(temp.path(), "staging/plugin.yml", "version: 1.4.0");

    let archive = temp.path().join("libs/guithium-paper-1.4.0.jar");
    PackerTool::new()
        .archive(&archive)
        .add_source(temp.path().join("classes"))
        .add_source(temp.path().join("staging"))
        .title("guithium-paper")
        .version("1.4.0")
        .pack()
        .unwrap();

    let (manifest, files) = read_archive(&archive).unwrap();
    let manifest = manifest.expect("manifest");
    assert_eq!(manifest.main().get("Implementation-Title"), Some("guithium-paper"));
    assert_eq!(manifest.main().get("Implementation-Version"), Some("1.4.0"));

    let names: Vec<&str> = files.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["dev/guithium/Api.class", "plugin.yml", "shared.txt"]);
    let shared = &files.iter().find(|(n, _)| n == "shared.txt").unwrap().1;
    assert_eq!(shared, b"from resources");
}

#[test]
fn test_pack_missing_required_classes_is_unresolved() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "staging/plugin.yml", "version: 1.4.0");
    let classes = temp.path().join("paper/build/classes/java/main");
    let archive = temp.path().join("libs/guithium-paper-1.4.0.jar");

    let err = PackerTool::new()
        .module("paper")
        .archive(&archive)
        .require_source(&classes)
        .add_source(temp.path().join("staging"))
        .pack()
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ArchiveError>(),
        Some(ArchiveError::Unresolved { module, path }) if module == "paper" && *path == classes
    ));
    assert!(!archive.exists());
}

#[test]
fn test_pack_missing_optional_source_is_empty() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "classes/dev/guithium/Api.class", "bytecode");
    let archive = temp.path().join("out.jar");

    PackerTool::new()
        .module("api")
        .archive(&archive)
        .require_source(temp.path().join("classes"))
        .add_source(temp.path().join("staging"))
        .pack()
        .unwrap();

    let (_, files) = read_archive(&archive).unwrap();
    assert_eq!(files.len(), 1);
}

#[test]
fn test_pack_keeps_tree_manifest_attributes() {
    let temp = tempfile::tempdir().unwrap();
    write(
        temp.path(),
        "staging/META-INF/MANIFEST.MF",
        "Manifest-Version: 1.0\r\nPremain-Class: dev.guithium.Agent\r\nImplementation-Version: 0.0.0\r\n\r\n",
    );

    let archive = temp.path().join("out.jar");
    PackerTool::new()
        .archive(&archive)
        .add_source(temp.path().join("staging"))
        .version("1.4.0")
        .pack()
        .unwrap();

    let (manifest, files) = read_archive(&archive).unwrap();
    let manifest = manifest.unwrap();
    assert_eq!(manifest.main().get("Premain-Class"), Some("dev.guithium.Agent"));
    assert_eq!(manifest.main().get("Implementation-Version"), Some("1.4.0"));
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let archive = temp.path().join("out.jar");
    let tool = PackerTool::new().archive(&archive);
    let ctx = ToolContext::new(Arc::new(Config::default()), CancellationToken::new(), true);

    let logs = run_with_logs(|| async { tool.run(&ctx).await }).await.unwrap();

    assert!(logs.contains("[dry-run] Would pack"));
    assert!(!archive.exists());
}
