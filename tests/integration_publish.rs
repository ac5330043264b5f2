// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for building and publishing against a mock Modrinth API.

use std::path::Path;
use std::sync::Arc;

use modpipe::build_info::BuildInfo;
use modpipe::cmd::build::plan_tasks;
use modpipe::config::Config;
use modpipe::error::{PipeError, PublishError};
use modpipe::net::ProgressDisplay;
use modpipe::publish::Credentials;
use modpipe::task::manager::TaskManager;
use modpipe::task::tasks::publish::PublishTask;
use modpipe::task::{Stages, Task};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn config(root: &Path, api_url: &str) -> Arc<Config> {
    let toml = format!(
        "[project]\nversion = \"1.4.0\"\n[paths]\nroot = {:?}\n[publish]\napi_url = {api_url:?}\n",
        root.display().to_string()
    );
    Arc::new(Config::parse(&toml).unwrap())
}

fn prebuilt_project(root: &Path) {
    for module in ["api", "fabric", "paper"] {
        write(
            root,
            &format!("{module}/build/classes/java/main/dev/guithium/{module}/Entry.class"),
            module.as_bytes(),
        );
    }
    write(root, "fabric/src/main/resources/fabric.mod.json", br#"{"version":"${version}"}"#);
    write(root, "paper/src/main/resources/plugin.yml", b"version: ${version}\n");
}

/// Build tasks followed by a publish task with explicit credentials.
fn manager(config: &Arc<Config>, token: Option<&str>) -> TaskManager {
    let build = BuildInfo::new(
        "guithium",
        "1.4.0",
        Some("0f3c2a1".to_string()),
        [("minecraft".to_string(), "1.21.4".to_string())],
    );
    let mut manager = TaskManager::new(Arc::clone(config), Arc::new(build))
        .with_stages(Stages::BUILD | Stages::PUBLISH);
    for task in plan_tasks(config, &[], Stages::BUILD).unwrap() {
        manager.add(task);
    }
    manager.add(Task::Publish(
        PublishTask::new()
            .with_credentials(Credentials::new(
                token.map(String::from),
                Some("Fix tooltip rendering".to_string()),
            ))
            .with_display(ProgressDisplay::Silent),
    ));
    manager
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}

#[tokio::test]
async fn build_then_publish_uploads_merged_archive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/project/guithium"))
        .and(header("authorization", "mrp_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "GUI123"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/project/fabric-api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "P7dR8mSH"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/version"))
        .and(header("authorization", "mrp_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "VER1", "version_number": "1.4.0"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    prebuilt_project(temp.path());
    let config = config(temp.path(), &server.uri());

    manager(&config, Some("mrp_token")).run_all().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("version upload");
    for expected in [
        r#""version_number":"1.4.0""#,
        r#""changelog":"Fix tooltip rendering""#,
        r#""game_versions":["1.21.4"]"#,
        r#""version_type":"alpha""#,
        r#""loaders":["paper","purpur","fabric"]"#,
        r#""project_id":"P7dR8mSH","dependency_type":"required""#,
        r#""project_id":"GUI123""#,
        "guithium-1.4.0.jar",
    ] {
        assert!(contains(&upload.body, expected), "upload body lacks {expected}");
    }
    assert!(config.merge_output().is_file());
}

#[tokio::test]
async fn missing_token_fails_after_build_and_keeps_archive() {
    let server = MockServer::start().await;
    let temp = tempfile::tempdir().unwrap();
    prebuilt_project(temp.path());
    let config = config(temp.path(), &server.uri());

    let err = manager(&config, None).run_all().await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipeError>(),
        Some(PipeError::Publish(e)) if matches!(**e, PublishError::MissingToken { .. })
    ));
    assert!(config.merge_output().is_file());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_upload_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "X"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/version"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid loaders"))
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    prebuilt_project(temp.path());
    let config = config(temp.path(), &server.uri());

    let err = manager(&config, Some("mrp_token")).run_all().await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipeError>(),
        Some(PipeError::Publish(e)) if matches!(**e, PublishError::Rejected { status: 400, .. })
    ));
}
