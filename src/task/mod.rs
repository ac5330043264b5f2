// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task execution system.
//!
//! # Architecture
//!
//! ```text
//! TaskManager
//!      |
//!      v
//!   Task enum ----> TaskContext (config, build info, cancel token)
//!      |
//!      v
//!  Parallel(wave api) --> Parallel(wave fabric, paper) --> Merge --> Publish
//!      |
//!   ModuleTask:  compile --> template --> package
//!                   |           |            |
//!                   v           v            v
//!              CompileTool TemplaterTool PackerTool
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`TaskManager`](manager::TaskManager) | Runs tasks in order with cancellation |
//! | [`Task`] | Enum dispatching to concrete task implementations |
//! | [`Taskable`] | Trait defining the common task interface |
//! | [`Stages`] | Bitflags selecting pipeline stages |
//! | [`TaskContext`] | Execution context shared by all tasks |
//!
//! The [`Task`] enum implements `Taskable` via the `impl_taskable_for_task!`
//! macro, which generates a match arm for each variant.

pub mod manager;
pub mod registry;
pub mod tasks;
pub mod tools;

use bitflags::bitflags;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::build_info::BuildInfo;
use crate::config::Config;
use crate::error::{Result, TaskError};
use crate::task::tools::ToolContext;

use tasks::merge::MergeTask;
use tasks::module::ModuleTask;
use tasks::publish::PublishTask;

bitflags! {
    /// Pipeline stages a run performs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Stages: u8 {
        const COMPILE = 0x01;
        const TEMPLATE = 0x02;
        const PACKAGE = 0x04;
        const MERGE = 0x08;
        const PUBLISH = 0x10;

        /// Everything `build` does.
        const BUILD = Self::COMPILE.bits() | Self::TEMPLATE.bits()
            | Self::PACKAGE.bits() | Self::MERGE.bits();
    }
}

impl Default for Stages {
    fn default() -> Self {
        Self::BUILD
    }
}

/// Trait for task implementations.
///
/// Methods return `BoxFuture` so that [`ParallelTasks`] can hold `Task`
/// values recursively.
pub trait Taskable {
    fn name(&self) -> &str;

    /// Whether this task should run. Default: `true`.
    fn enabled(&self, _ctx: &TaskContext) -> bool {
        true
    }

    /// Removes outputs this task owns. Runs only with `--clean`.
    fn do_clean<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>>;

    /// Performs the task's enabled stages.
    fn do_run<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>>;
}

/// Context provided to tasks during execution.
#[derive(Clone)]
pub struct TaskContext {
    config: Arc<Config>,
    build: Arc<BuildInfo>,
    cancel_token: CancellationToken,
    /// Bounds concurrently running children of [`ParallelTasks`].
    semaphore: Arc<Semaphore>,
    dry_run: bool,
    clean: bool,
    stages: Stages,
}

impl TaskContext {
    #[must_use]
    pub fn new(config: Arc<Config>, build: Arc<BuildInfo>, cancel_token: CancellationToken) -> Self {
        Self {
            config,
            build,
            cancel_token,
            semaphore: Arc::new(Semaphore::new(default_parallelism())),
            dry_run: false,
            clean: false,
            stages: Stages::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    #[must_use]
    pub const fn build(&self) -> &Arc<BuildInfo> {
        &self.build
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
    pub const fn clean(&self) -> bool {
        self.clean
    }

    #[must_use]
    pub const fn stages(&self) -> Stages {
        self.stages
    }

    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub const fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    #[must_use]
    pub const fn with_stages(mut self, stages: Stages) -> Self {
        self.stages = stages;
        self
    }

    #[must_use]
    pub fn with_semaphore(mut self, semaphore: Arc<Semaphore>) -> Self {
        self.semaphore = semaphore;
        self
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    #[must_use]
    pub fn tool_context(&self) -> ToolContext {
        ToolContext::new(
            Arc::clone(&self.config),
            self.cancel_token.clone(),
            self.dry_run,
        )
    }
}

/// Available parallelism, falling back to 4.
#[must_use]
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4)
}

/// A wave of tasks executed concurrently.
///
/// Each child holds a semaphore permit while it runs. All children run to
/// completion; the first error is returned and the rest are logged.
#[derive(Debug, Clone)]
pub struct ParallelTasks {
    name: String,
    children: Vec<Task>,
}

impl ParallelTasks {
    #[must_use]
    pub fn new(name: impl Into<String>, children: Vec<Task>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[Task] {
        &self.children
    }

    async fn run_children(&self, ctx: &TaskContext, clean: bool) -> Result<()> {
        let mut set = JoinSet::new();
        for child in &self.children {
            let child = child.clone();
            let ctx = ctx.clone();
            set.spawn(async move {
                let _permit = ctx.semaphore.clone().acquire_owned().await?;
                if clean {
                    Taskable::do_clean(&child, &ctx).await
                } else {
                    child.run_stages(&ctx).await
                }
            });
        }

        let mut errors = Vec::new();
        while let Some(result) = set.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => errors.push(e),
                Err(e) => errors.push(anyhow::anyhow!("task panicked: {e}")),
            }
        }

        let mut errors = errors.into_iter();
        match errors.next() {
            Some(first) => {
                for (i, e) in errors.enumerate() {
                    tracing::error!(error = %format!("{e:#}"), task_index = i + 2, "additional parallel task error");
                }
                Err(first)
            }
            None => Ok(()),
        }
    }
}

impl Taskable for ParallelTasks {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, _ctx: &TaskContext) -> bool {
        !self.children.is_empty()
    }

    fn do_clean<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.run_children(ctx, true))
    }

    fn do_run<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.run_children(ctx, false))
    }
}

/// A pipeline task.
#[derive(Debug, Clone)]
pub enum Task {
    /// Concurrent wave of tasks.
    Parallel(ParallelTasks),
    /// Compile, template and package one module.
    Module(ModuleTask),
    /// Merge module archives into the root archive.
    Merge(MergeTask),
    /// Upload the merged archive.
    Publish(PublishTask),
}

impl Task {
    /// Runs the clean phase (when requested) and then the task itself.
    ///
    /// # Errors
    ///
    /// Returns an error if either phase fails or cancellation was requested.
    pub async fn run(&self, ctx: &TaskContext) -> Result<()> {
        if !Taskable::enabled(self, ctx) {
            tracing::debug!(task = %Taskable::name(self), "skipping disabled task");
            return Ok(());
        }

        if ctx.clean() {
            Self::check_cancelled(self, ctx)?;
            Taskable::do_clean(self, ctx).await?;
        }
        self.run_stages(ctx).await
    }

    async fn run_stages(&self, ctx: &TaskContext) -> Result<()> {
        Self::check_cancelled(self, ctx)?;
        Taskable::do_run(self, ctx).await
    }

    fn check_cancelled(&self, ctx: &TaskContext) -> Result<()> {
        if ctx.is_cancelled() {
            return Err(TaskError::Interrupted(Taskable::name(self).to_string()).into());
        }
        Ok(())
    }
}

/// Implements `Taskable` for `Task` by delegating to the inner types.
macro_rules! impl_taskable_for_task {
    ($($variant:ident),+ $(,)?) => {
        impl Taskable for Task {
            fn name(&self) -> &str {
                match self {
                    $(Task::$variant(t) => Taskable::name(t),)+
                }
            }

            fn enabled(&self, ctx: &TaskContext) -> bool {
                match self {
                    $(Task::$variant(t) => Taskable::enabled(t, ctx),)+
                }
            }

            fn do_clean<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
                match self {
                    $(Task::$variant(t) => Taskable::do_clean(t, ctx),)+
                }
            }

            fn do_run<'a>(&'a self, ctx: &'a TaskContext) -> BoxFuture<'a, Result<()>> {
                match self {
                    $(Task::$variant(t) => Taskable::do_run(t, ctx),)+
                }
            }
        }
    };
}

impl_taskable_for_task!(Parallel, Module, Merge, Publish);
