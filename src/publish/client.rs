// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{FILE_PART, VersionData};
use crate::error::{PipeError, PipeResult, PublishError};
use crate::net::{ProgressDisplay, global_client, upload_body};

const JAR_MIME: &str = "application/java-archive";

/// Version created by an upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishedVersion {
    pub id: String,
    pub version_number: String,
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    id: String,
}

/// Minimal Modrinth v2 API client.
#[derive(Debug, Clone)]
pub struct ModrinthClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ModrinthClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: global_client().clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport(url: &str) -> impl FnOnce(reqwest::Error) -> PublishError + '_ {
        move |source| PublishError::Transport {
            url: url.to_string(),
            source,
        }
    }

    async fn rejected(response: Response) -> PublishError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        PublishError::Rejected { status, body }
    }

    /// Resolves a project slug (or id) to its id.
    ///
    /// # Errors
    ///
    /// `ProjectNotFound` on 404, `Rejected` on other failures.
    pub async fn resolve_project(&self, slug: &str) -> PipeResult<String> {
        let url = format!("{}/project/{slug}", self.base_url);
        debug!(url = %url, "resolving project");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, &self.token)
            .send()
            .await
            .map_err(Self::transport(&url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PublishError::ProjectNotFound {
                slug: slug.to_string(),
            }
            .into());
        }
        if !response.status().is_success() {
            return Err(Self::rejected(response).await.into());
        }

        let project: ProjectInfo = response.json().await.map_err(Self::transport(&url))?;
        debug!(slug = %slug, id = %project.id, "resolved project");
        Ok(project.id)
    }

    /// Creates a version with the archive as its primary file.
    ///
    /// # Errors
    ///
    /// `ArchiveMissing` if the archive cannot be read, `Rejected` on a
    /// non-success response.
    pub async fn create_version(
        &self,
        data: &VersionData,
        archive: &Path,
        display: ProgressDisplay,
    ) -> PipeResult<PublishedVersion> {
        let url = format!("{}/version", self.base_url);
        let bytes = tokio::fs::read(archive)
            .await
            .map_err(|_| PublishError::ArchiveMissing(archive.to_path_buf()))?;
        let file_name = archive
            .file_name()
            .map_or_else(|| "archive.jar".to_string(), |n| n.to_string_lossy().into_owned());

        let json = serde_json::to_string(data).map_err(|e| {
            PipeError::Other(format!("could not encode version data: {e}").into_boxed_str())
        })?;
        let (body, length, bar) = upload_body(bytes, display);
        let file = Part::stream_with_length(body, length)
            .file_name(file_name)
            .mime_str(JAR_MIME)
            .map_err(Self::transport(&url))?;
        let form = Form::new().text("data", json).part(FILE_PART, file);

        debug!(url = %url, archive = %archive.display(), bytes = length, "uploading");
        let result = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.token)
            .multipart(form)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                if let Some(bar) = &bar {
                    bar.abandon_with_message("failed");
                }
                return Err(Self::transport(&url)(e).into());
            }
        };

        if !response.status().is_success() {
            if let Some(bar) = &bar {
                bar.abandon_with_message("rejected");
            }
            return Err(Self::rejected(response).await.into());
        }
        if let Some(bar) = bar {
            bar.finish_with_message("uploaded");
        }

        Ok(response.json().await.map_err(Self::transport(&url))?)
    }
}
