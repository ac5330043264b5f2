// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Module task implementation.
//!
//! ```text
//! ModuleTask(fabric)
//!   COMPILE   CompileTool    classes dir must exist afterwards
//!   TEMPLATE  TemplaterTool  resources --> staging/fabric
//!   PACKAGE   PackerTool     classes + staging --> guithium-fabric-<version>.jar
//! clean: staging dir + module archive
//! ```

use std::path::Path;

use anyhow::Context;
use futures_util::future::BoxFuture;
use tracing::info;

use crate::config::module::Module;
use crate::error::Result;
use crate::logging::LogContext;
use crate::task::tools::Tool;
use crate::task::tools::compile::CompileTool;
use crate::task::tools::packer::PackerTool;
use crate::task::tools::templater::TemplaterTool;
use crate::task::{Stages, TaskContext, Taskable};

/// Builds one module's archive.
#[derive(Debug, Clone)]
pub struct ModuleTask {
    module: Module,
}

impl ModuleTask {
    #[must_use]
    pub const fn new(module: Module) -> Self {
        Self { module }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.module.name()
    }

    #[must_use]
    pub const fn module(&self) -> &Module {
        &self.module
    }

    fn compile_tool(&self, ctx: &TaskContext) -> CompileTool {
        CompileTool::for_module(&self.module, ctx.config(), ctx.build().version())
    }

    fn templater_tool(&self, ctx: &TaskContext) -> TemplaterTool {
        TemplaterTool::for_module(&self.module, ctx.build().tokens_for(self.module.tokens()))
    }

    fn packer_tool(&self, ctx: &TaskContext) -> PackerTool {
        PackerTool::for_module(&self.module, ctx.build().name(), ctx.build().version())
    }

    /// Removes the staged resources and the module archive.
    ///
    /// # Errors
    ///
    /// Returns an error if either cannot be removed.
    pub async fn do_clean(&self, ctx: &TaskContext) -> Result<()> {
        for path in [self.module.staging_dir(), self.module.archive()] {
            remove_path(path, ctx.is_dry_run()).await?;
        }
        Ok(())
    }

    /// Runs the stages selected in `ctx`, in pipeline order.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error; later stages do not run.
    pub async fn do_run(&self, ctx: &TaskContext) -> Result<()> {
        let tool_ctx = ctx.tool_context();
        let mut log = LogContext::with_module(self.module.name());

        let steps: [(Stages, &str, Box<dyn Tool>); 3] = [
            (Stages::COMPILE, "compile", Box::new(self.compile_tool(ctx))),
            (Stages::TEMPLATE, "template", Box::new(self.templater_tool(ctx))),
            (Stages::PACKAGE, "package", Box::new(self.packer_tool(ctx))),
        ];

        for (stage, label, tool) in steps {
            if !ctx.stages().contains(stage) {
                continue;
            }
            log.set_stage(label);
            info!(module = %self.module.name(), stage = label, "{}starting", log.prefix());
            tool.run(&tool_ctx)
                .await
                .with_context(|| format!("{}{} failed", log.prefix(), tool.name()))?;
        }
        Ok(())
    }
}

pub(crate) async fn remove_path(path: &Path, dry_run: bool) -> Result<()> {
    let Ok(metadata) = tokio::fs::symlink_metadata(path).await else {
        return Ok(());
    };
    if dry_run {
        info!(path = %path.display(), "[dry-run] Would remove");
        return Ok(());
    }

    info!(path = %path.display(), "removing");
    if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    }
    .with_context(|| format!("failed to remove {}", path.display()))
}

impl Taskable for ModuleTask {
    fn name(&self) -> &str {
        self.module.name()
    }

    fn enabled(&self, _ctx: &TaskContext) -> bool {
        self.module.enabled()
    }

    fn do_clean<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.do_clean(ctx))
    }

    fn do_run<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.do_run(ctx))
    }
}

#[cfg(test)]
mod tests;
