// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::ModuleTask;
use crate::build_info::BuildInfo;
use crate::config::Config;
use crate::error::{ArchiveError, TemplateError};
use crate::jar::read_archive;
use crate::task::{Stages, TaskContext, Taskable};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn setup(root: &Path) -> (Arc<Config>, TaskContext) {
    let toml = format!(
        "[project]\nversion = \"1.4.0\"\n[paths]\nroot = {:?}\n",
        root.display().to_string()
    );
    let config = Arc::new(Config::parse(&toml).unwrap());
    let build = Arc::new(BuildInfo::new(
        "guithium",
        "1.4.0",
        Some("abc123".to_string()),
        [
            ("minecraft".to_string(), "1.21.4".to_string()),
            ("fabricloader".to_string(), "0.16.10".to_string()),
        ],
    ));
    let ctx = TaskContext::new(Arc::clone(&config), build, CancellationToken::new());
    (config, ctx)
}

#[test]
fn test_module_task_name() {
    let config = Config::parse("").unwrap();
    let task = ModuleTask::new(config.module("fabric").unwrap());
    assert_eq!(Taskable::name(&task), "fabric");
}

#[tokio::test]
async fn test_run_packages_fabric_module() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "fabric/build/classes/java/main/dev/guithium/Mod.class", "class");
    write(
        temp.path(),
        "fabric/src/main/resources/fabric.mod.json",
        r#"{"version":"${version}","minecraft":"${minecraft}","loader":"${fabricloader}"}"#,
    );
    let (config, ctx) = setup(temp.path());
    let module = config.module("fabric").unwrap();
    let archive = module.archive().to_path_buf();

    ModuleTask::new(module).do_run(&ctx).await.unwrap();

    assert!(archive.ends_with("build/libs/guithium-fabric-1.4.0.jar"));
    let (manifest, files) = read_archive(&archive).unwrap();
    assert_eq!(
        manifest.unwrap().main().get("Implementation-Title"),
        Some("guithium-fabric")
    );
    let names: Vec<&str> = files.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["dev/guithium/Mod.class", "fabric.mod.json"]);
    assert_eq!(
        String::from_utf8(files[1].1.clone()).unwrap(),
        r#"{"version":"1.4.0","minecraft":"1.21.4","loader":"0.16.10"}"#
    );
}

#[tokio::test]
async fn test_missing_classes_stops_before_packaging() {
    let temp = tempfile::tempdir().unwrap();
    let (config, ctx) = setup(temp.path());
    let module = config.module("paper").unwrap();
    let archive = module.archive().to_path_buf();

    let err = ModuleTask::new(module).do_run(&ctx).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ArchiveError>(),
        Some(ArchiveError::Unresolved { module, .. }) if module == "paper"
    ));
    assert!(!archive.exists());
}

#[tokio::test]
async fn test_template_failure_aborts_module() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "paper/build/classes/java/main/P.class", "class");
    // paper does not bind fabricloader
    write(
        temp.path(),
        "paper/src/main/resources/plugin.yml",
        "version: ${version}\nloader: ${fabricloader}\n",
    );
    let (config, ctx) = setup(temp.path());
    let module = config.module("paper").unwrap();
    let archive = module.archive().to_path_buf();

    let err = ModuleTask::new(module).do_run(&ctx).await.unwrap_err();

    assert!(err.downcast_ref::<TemplateError>().is_some());
    assert!(!archive.exists());
}

#[tokio::test]
async fn test_stages_select_work() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "api/src/main/resources/a.txt", "a");
    let (config, ctx) = setup(temp.path());
    let ctx = ctx.with_stages(Stages::TEMPLATE);
    let module = config.module("api").unwrap();
    let staged = module.staging_dir().join("a.txt");
    let archive = module.archive().to_path_buf();

    // No classes: compile would fail, but only TEMPLATE runs.
    ModuleTask::new(module).do_run(&ctx).await.unwrap();

    assert!(staged.exists());
    assert!(!archive.exists());
}

#[tokio::test]
async fn test_clean_removes_staging_and_archive() {
    let temp = tempfile::tempdir().unwrap();
    let (config, ctx) = setup(temp.path());
    let module = config.module("api").unwrap();
    write(module.staging_dir(), "a.txt", "a");
    std::fs::create_dir_all(module.archive().parent().unwrap()).unwrap();
    std::fs::write(module.archive(), b"jar").unwrap();

    let task = ModuleTask::new(module.clone());
    task.do_clean(&ctx).await.unwrap();

    assert!(!module.staging_dir().exists());
    assert!(!module.archive().exists());
}

#[tokio::test]
async fn test_clean_dry_run_keeps_files() {
    let temp = tempfile::tempdir().unwrap();
    let (config, ctx) = setup(temp.path());
    let ctx = ctx.with_dry_run(true);
    let module = config.module("api").unwrap();
    write(module.staging_dir(), "a.txt", "a");

    ModuleTask::new(module.clone()).do_clean(&ctx).await.unwrap();

    assert!(module.staging_dir().join("a.txt").exists());
}
