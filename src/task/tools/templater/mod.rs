// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Resource staging with token expansion.
//!
//! ```text
//! resources/                         staging/<module>/
//!   fabric.mod.json  --expand-->       fabric.mod.json   "${version}" -> "1.4.0"
//!   assets/icon.png  --copy---->       assets/icon.png
//! ```
//!
//! A file is a template when one of the module's patterns matches either its
//! relative path or its file name. Everything else is copied byte for byte.
//! The staging directory is rebuilt from scratch on every run.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};
use wax::{Glob, Program};

use super::{BoxFuture, Tool, ToolContext};
use crate::build_info::Tokens;
use crate::config::module::Module;
use crate::error::{Result, TemplateError};
use crate::template::expand_bytes;
use crate::utility::fs::walk::{TreeFile, tree_files};

/// Counts from a staging run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSummary {
    pub expanded: usize,
    pub copied: usize,
}

/// Stages a module's resources, expanding designated templates.
#[derive(Debug, Clone)]
pub struct TemplaterTool {
    module: String,
    resources_dir: Option<PathBuf>,
    staging_dir: Option<PathBuf>,
    patterns: Vec<String>,
    tokens: Tokens,
}

impl TemplaterTool {
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            resources_dir: None,
            staging_dir: None,
            patterns: Vec::new(),
            tokens: Tokens::new(),
        }
    }

    /// Configures the tool from a resolved module and its visible tokens.
    #[must_use]
    pub fn for_module(module: &Module, tokens: Tokens) -> Self {
        Self::new(module.name())
            .resources_dir(module.resources_dir())
            .staging_dir(module.staging_dir())
            .patterns(module.templates())
            .tokens(tokens)
    }

    #[must_use]
    pub fn resources_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.resources_dir = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn staging_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.staging_dir = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn tokens(mut self, tokens: Tokens) -> Self {
        self.tokens = tokens;
        self
    }

    fn get_resources_dir(&self) -> Result<&Path> {
        self.resources_dir
            .as_deref()
            .context("templater: resources directory not set")
    }

    fn get_staging_dir(&self) -> Result<&Path> {
        self.staging_dir
            .as_deref()
            .context("templater: staging directory not set")
    }

    fn compile_patterns(&self) -> std::result::Result<Vec<Glob<'_>>, TemplateError> {
        self.patterns
            .iter()
            .map(|pattern| {
                Glob::new(pattern).map_err(|e| TemplateError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })
            })
            .collect()
    }

    /// Rebuilds the staging directory. Blocking.
    ///
    /// # Errors
    ///
    /// Returns a `TemplateError` for an invalid pattern, a non-UTF-8 template
    /// or an unbound token, and an I/O error if staging fails.
    pub fn stage(&self) -> Result<StageSummary> {
        let resources = self.get_resources_dir()?;
        let staging = self.get_staging_dir()?;
        let globs = self.compile_patterns()?;

        if staging.exists() {
            std::fs::remove_dir_all(staging)
                .with_context(|| format!("failed to clear {}", staging.display()))?;
        }
        std::fs::create_dir_all(staging)
            .with_context(|| format!("failed to create {}", staging.display()))?;

        let mut summary = StageSummary::default();
        for file in tree_files(resources)? {
            let target = staging.join(&file.relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }

            if is_template(&globs, &file) {
                let bytes = std::fs::read(&file.path)
                    .with_context(|| format!("failed to read {}", file.path.display()))?;
                let origin = format!("{}/{}", self.module, file.relative);
                let rendered = expand_bytes(&bytes, &origin, &self.tokens)?;
                std::fs::write(&target, rendered)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                debug!(module = %self.module, file = %file.relative, "expanded template");
                summary.expanded += 1;
            } else {
                std::fs::copy(&file.path, &target)
                    .with_context(|| format!("failed to copy {}", file.path.display()))?;
                summary.copied += 1;
            }
        }
        Ok(summary)
    }
}

fn is_template(globs: &[Glob<'_>], file: &TreeFile) -> bool {
    let name = file
        .relative
        .rsplit('/')
        .next()
        .unwrap_or(file.relative.as_str());
    globs
        .iter()
        .any(|glob| glob.is_match(file.relative.as_str()) || glob.is_match(name))
}

impl Tool for TemplaterTool {
    fn name(&self) -> &str {
        "templater"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if ctx.is_dry_run() {
                info!(
                    module = %self.module,
                    patterns = ?self.patterns,
                    "[dry-run] Would stage resources into {}",
                    self.get_staging_dir()?.display()
                );
                return Ok(());
            }

            let tool = self.clone();
            let summary = tokio::task::spawn_blocking(move || tool.stage())
                .await
                .context("templater task panicked")??;
            info!(
                module = %self.module,
                expanded = summary.expanded,
                copied = summary.copied,
                "staged resources"
            );
            Ok(())
        })
    }
}
