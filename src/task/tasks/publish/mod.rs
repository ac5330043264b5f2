// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish task implementation.
//!
//! ```text
//! PublishTask
//!   credentials: explicit, or read from publish.token_env / changelog_env
//!   archive:     merge output
//!   dry-run:     log the upload (warn when the token is missing)
//!   otherwise:   publish::publish()
//! ```

use futures_util::future::BoxFuture;
use tracing::{info, warn};

use crate::error::Result;
use crate::net::ProgressDisplay;
use crate::publish::{Credentials, PublishRequest, publish};
use crate::task::{Stages, TaskContext, Taskable};

/// Uploads the merged archive.
#[derive(Debug, Clone)]
pub struct PublishTask {
    name: String,
    credentials: Option<Credentials>,
    display: ProgressDisplay,
}

impl Default for PublishTask {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishTask {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "publish".to_string(),
            credentials: None,
            display: ProgressDisplay::default(),
        }
    }

    /// Uses these credentials instead of reading the environment.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub const fn with_display(mut self, display: ProgressDisplay) -> Self {
        self.display = display;
        self
    }

    /// Assembles the upload request for the merged archive.
    #[must_use]
    pub fn request(&self, ctx: &TaskContext) -> PublishRequest {
        let config = ctx.config();
        let credentials = self
            .credentials
            .clone()
            .unwrap_or_else(|| Credentials::from_env(&config.publish));
        PublishRequest::new(config, ctx.build(), config.merge_output(), credentials)
    }

    /// Publishing owns no local outputs.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub async fn do_clean(&self, _ctx: &TaskContext) -> Result<()> {
        Ok(())
    }

    /// Uploads the archive when the PUBLISH stage is selected.
    ///
    /// # Errors
    ///
    /// Returns the `PublishError` raised by the upload.
    pub async fn do_run(&self, ctx: &TaskContext) -> Result<()> {
        if !ctx.stages().contains(Stages::PUBLISH) {
            return Ok(());
        }

        let request = self.request(ctx);
        if ctx.is_dry_run() {
            if request.credentials().token().is_none() {
                warn!(
                    variable = %ctx.config().publish.token_env,
                    "upload token not set, a real run would fail"
                );
            }
            info!(
                project = %request.project(),
                version = %request.version_number(),
                version_type = %request.version_type(),
                loaders = ?request.loaders(),
                game_versions = ?request.game_versions(),
                "[dry-run] Would publish {}",
                request.archive().display()
            );
            return Ok(());
        }

        let published = publish(&request, self.display).await?;
        info!(id = %published.id, "upload complete");
        Ok(())
    }
}

impl Taskable for PublishTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn do_clean<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.do_clean(ctx))
    }

    fn do_run<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.do_run(ctx))
    }
}
