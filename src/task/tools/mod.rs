// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tool abstractions for task execution.
//!
//! ```text
//! ModuleTask --> ToolContext --> Tools
//!   CompileTool    ProcessBuilder (shell command, env)
//!   TemplaterTool  resources --> staging (token expansion)
//!   PackerTool     classes + staging --> module archive
//! ToolContext: cancel token --> run_with_cancellation
//! ```
//!
//! All tools support graceful cancellation via `CancellationToken`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::Result;

pub mod compile;
pub mod packer;
pub mod templater;

use futures_util::future::BoxFuture;

/// Context provided to tools during execution.
#[derive(Clone)]
pub struct ToolContext {
    /// Tools check this token and abort if cancelled.
    cancel_token: CancellationToken,

    /// When true, tools log what they would do without making changes.
    dry_run: bool,

    config: Arc<Config>,
}

impl ToolContext {
    #[must_use]
    pub const fn new(config: Arc<Config>, cancel_token: CancellationToken, dry_run: bool) -> Self {
        Self {
            cancel_token,
            dry_run,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// A single step of a module's pipeline.
///
/// Tools should use `ProcessBuilder::run_with_cancellation()` for external
/// processes and only log their actions when `ctx.is_dry_run()` is set.
pub trait Tool: Send + Sync {
    /// Returns the name of this tool (e.g., "compile", "templater").
    fn name(&self) -> &str;

    /// Executes the tool's operation.
    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>>;
}

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;
