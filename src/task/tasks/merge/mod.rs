// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Merge task implementation.
//!
//! ```text
//! MergeTask
//!   merge.order [api, fabric, paper] --> module archives
//!        |
//!        v
//!   ArchiveMerger (version + commit from BuildInfo, merge.conflicts)
//!        |
//!        v
//!   <libs>/<project>-<version>.jar
//! ```

use anyhow::Context;
use futures_util::future::BoxFuture;
use tracing::info;

use crate::build_info::BuildInfo;
use crate::config::Config;
use crate::error::Result;
use crate::jar::{ArchiveMerger, MergeInput, MergeReport};
use crate::task::tasks::module::remove_path;
use crate::task::{Stages, TaskContext, Taskable};

/// Merges module archives into the root archive.
#[derive(Debug, Clone)]
pub struct MergeTask {
    name: String,
}

impl Default for MergeTask {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeTask {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "merge".to_string(),
        }
    }

    /// Builds the merger for `config.merge.order`.
    ///
    /// # Errors
    ///
    /// Returns an error if the merge order names a module that does not exist.
    pub fn merger(config: &Config, build: &BuildInfo) -> Result<ArchiveMerger> {
        let inputs = config
            .merge
            .order
            .iter()
            .map(|name| {
                config
                    .module(name)
                    .map(|module| MergeInput::new(name.as_str(), module.archive()))
                    .with_context(|| format!("merge order names unknown module '{name}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ArchiveMerger::builder()
            .with_inputs(inputs)
            .with_output(config.merge_output())
            .with_version(build.version())
            .maybe_with_commit(build.commit().map(String::from))
            .with_conflicts(config.merge.conflicts)
            .build())
    }

    /// Removes the merged archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be removed.
    pub async fn do_clean(&self, ctx: &TaskContext) -> Result<()> {
        remove_path(&ctx.config().merge_output(), ctx.is_dry_run()).await
    }

    /// Runs the merge when the MERGE stage is selected.
    ///
    /// # Errors
    ///
    /// Returns an error for unresolved inputs, unreadable archives, a
    /// conflict under the `fail` policy, or a failed write. The output is
    /// left untouched on error.
    pub async fn do_run(&self, ctx: &TaskContext) -> Result<()> {
        if !ctx.stages().contains(Stages::MERGE) {
            return Ok(());
        }

        let merger = Self::merger(ctx.config(), ctx.build())?;
        if ctx.is_dry_run() {
            let modules: Vec<&str> = merger.inputs().iter().map(|i| i.module.as_str()).collect();
            info!(
                modules = ?modules,
                commit = ctx.build().commit().unwrap_or("unknown"),
                "[dry-run] Would merge into {}",
                merger.output().display()
            );
            return Ok(());
        }

        let report: MergeReport = tokio::task::spawn_blocking(move || merger.merge())
            .await
            .context("merge task panicked")??;
        info!(
            archive = %report.output.display(),
            entries = report.entries,
            overwritten = report.overwritten.len(),
            "merged archive"
        );
        Ok(())
    }
}

impl Taskable for MergeTask {
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
