// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Upload of the merged archive to Modrinth.
//!
//! ```text
//! PublishConfig + BuildInfo + env (MODRINTH_TOKEN, COMMIT_MESSAGE)
//!            |
//!            v
//!      PublishRequest            token/changelog: Option, never an error here
//!            |
//!      publish(request)
//!        token missing?   --> PublishError::MissingToken
//!        archive missing? --> PublishError::ArchiveMissing
//!        GET  /project/{slug}     project + dependency ids
//!        POST /version            multipart: data (JSON) + file
//!            |
//!            v
//!      PublishedVersion { id, version_number }
//! ```
//!
//! The archive is only ever read. Nothing is retried.

mod client;

pub use client::{ModrinthClient, PublishedVersion};

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::build_info::BuildInfo;
use crate::config::Config;
use crate::config::types::{PublishConfig, VersionType};
use crate::error::{PipeResult, PublishError};
use crate::net::ProgressDisplay;

/// Name of the multipart part carrying the archive.
pub const FILE_PART: &str = "file";

/// Values read from the environment when the request is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    token: Option<String>,
    changelog: Option<String>,
}

impl Credentials {
    #[must_use]
    pub const fn new(token: Option<String>, changelog: Option<String>) -> Self {
        Self { token, changelog }
    }

    /// Reads the configured variables from the process environment.
    /// Unset or empty variables become `None`.
    #[must_use]
    pub fn from_env(config: &PublishConfig) -> Self {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Like [`Self::from_env`] with a custom variable source.
    #[must_use]
    pub fn from_lookup(config: &PublishConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            token: read(&config.token_env),
            changelog: read(&config.changelog_env),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn changelog(&self) -> Option<&str> {
        self.changelog.as_deref()
    }
}

/// Everything needed for one upload.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    api_url: String,
    project: String,
    name: String,
    version_number: String,
    version_type: VersionType,
    game_versions: Vec<String>,
    loaders: Vec<String>,
    dependencies: Vec<String>,
    featured: bool,
    archive: PathBuf,
    token_env: String,
    credentials: Credentials,
}

impl PublishRequest {
    /// Assembles the request. Never fails: a missing token only surfaces
    /// when [`publish`] runs.
    #[must_use]
    pub fn new(
        config: &Config,
        build: &BuildInfo,
        archive: impl Into<PathBuf>,
        credentials: Credentials,
    ) -> Self {
        Self {
            api_url: config.publish.api_url.clone(),
            project: config.publish_project().to_string(),
            name: build.version().to_string(),
            version_number: build.version().to_string(),
            version_type: config.publish.version_type,
            game_versions: config.game_versions(),
            loaders: config.publish.loaders.clone(),
            dependencies: config.publish.dependencies.clone(),
            featured: config.publish.featured,
            archive: archive.into(),
            token_env: config.publish.token_env.clone(),
            credentials,
        }
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    #[must_use]
    pub fn version_number(&self) -> &str {
        &self.version_number
    }

    #[must_use]
    pub const fn version_type(&self) -> VersionType {
        self.version_type
    }

    #[must_use]
    pub fn game_versions(&self) -> &[String] {
        &self.game_versions
    }

    #[must_use]
    pub fn loaders(&self) -> &[String] {
        &self.loaders
    }

    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    #[must_use]
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The token, or `PublishError::MissingToken`.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn require_token(&self) -> Result<&str, PublishError> {
        self.credentials
            .token()
            .ok_or_else(|| PublishError::MissingToken {
                variable: self.token_env.clone(),
            })
    }

    /// The `data` part for `POST /version`, with project and dependency
    /// slugs already resolved to ids.
    #[must_use]
    pub fn version_data(&self, project_id: &str, dependency_ids: &[String]) -> VersionData {
        VersionData {
            name: self.name.clone(),
            version_number: self.version_number.clone(),
            changelog: self.credentials.changelog.clone(),
            dependencies: dependency_ids
                .iter()
                .map(|id| VersionDependency {
                    project_id: id.clone(),
                    dependency_type: "required",
                })
                .collect(),
            game_versions: self.game_versions.clone(),
            version_type: self.version_type,
            loaders: self.loaders.clone(),
            featured: self.featured,
            project_id: project_id.to_string(),
            file_parts: vec![FILE_PART.to_string()],
            primary_file: FILE_PART.to_string(),
        }
    }
}

/// JSON body of the `data` part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionData {
    pub name: String,
    pub version_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    pub dependencies: Vec<VersionDependency>,
    pub game_versions: Vec<String>,
    pub version_type: VersionType,
    pub loaders: Vec<String>,
    pub featured: bool,
    pub project_id: String,
    pub file_parts: Vec<String>,
    pub primary_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDependency {
    pub project_id: String,
    pub dependency_type: &'static str,
}

/// Uploads the archive described by `request`.
///
/// # Errors
///
/// `MissingToken` when no token is set, `ArchiveMissing` when the archive
/// does not exist, `ProjectNotFound` for an unknown slug, `Rejected` for any
/// other non-success response, `Transport` for network failures.
pub async fn publish(
    request: &PublishRequest,
    display: ProgressDisplay,
) -> PipeResult<PublishedVersion> {
    let token = request.require_token()?;
    if !request.archive.is_file() {
        return Err(PublishError::ArchiveMissing(request.archive.clone()).into());
    }

    let client = ModrinthClient::new(&request.api_url, token);
    let project_id = client.resolve_project(&request.project).await?;
    let mut dependency_ids = Vec::with_capacity(request.dependencies.len());
    for slug in &request.dependencies {
        dependency_ids.push(client.resolve_project(slug).await?);
    }

    let data = request.version_data(&project_id, &dependency_ids);
    let published = client
        .create_version(&data, &request.archive, display)
        .await?;

    info!(
        project = %request.project,
        version = %published.version_number,
        id = %published.id,
        "published version"
    );
    Ok(published)
}
