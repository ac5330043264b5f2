// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task manager for orchestrating task execution.
//!
//! ```text
//! TaskManager::new(config, build)
//!   .with_dry_run()  .with_clean()  .with_stages()
//!   .add()  .cancel_token() (Ctrl+C watcher)
//!   .run_all().await
//!       per task: [clean] --> run
//!       waves share one semaphore (global.jobs or CPU count)
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::build_info::BuildInfo;
use crate::config::Config;
use crate::error::{Result, TaskError};

use super::{Stages, Task, TaskContext, Taskable, default_parallelism};

/// Runs tasks sequentially in insertion order.
pub struct TaskManager {
    tasks: Vec<Task>,
    cancel_token: CancellationToken,
    config: Arc<Config>,
    build: Arc<BuildInfo>,
    concurrency_semaphore: Arc<Semaphore>,
    jobs: usize,
    dry_run: bool,
    clean: bool,
    stages: Stages,
}

impl TaskManager {
    /// Creates a manager; the concurrency limit is `global.jobs` or the CPU
    /// count, at least 1.
    #[must_use]
    pub fn new(config: Arc<Config>, build: Arc<BuildInfo>) -> Self {
        let jobs = config.global.jobs.unwrap_or_else(default_parallelism).max(1);
        Self {
            tasks: Vec::new(),
            cancel_token: CancellationToken::new(),
            config,
            build,
            concurrency_semaphore: Arc::new(Semaphore::new(jobs)),
            jobs,
            dry_run: false,
            clean: false,
            stages: Stages::default(),
        }
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

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub const fn task_count(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Cancelling this token interrupts the run.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Maximum number of wave members running at once.
    #[must_use]
    pub const fn jobs(&self) -> usize {
        self.jobs
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub const fn stages(&self) -> Stages {
        self.stages
    }

    fn create_context(&self) -> TaskContext {
        TaskContext::new(
            Arc::clone(&self.config),
            Arc::clone(&self.build),
            self.cancel_token.clone(),
        )
        .with_semaphore(Arc::clone(&self.concurrency_semaphore))
        .with_dry_run(self.dry_run)
        .with_clean(self.clean)
        .with_stages(self.stages)
    }

    /// Runs all tasks, checking for cancellation between them.
    ///
    /// # Errors
    ///
    /// Returns the first task failure, or `TaskError::Interrupted`.
    pub async fn run_all(&self) -> Result<()> {
        if self.tasks.is_empty() {
            tracing::debug!("no tasks to run");
            return Ok(());
        }

        tracing::info!(
            task_count = self.task_count(),
            jobs = self.jobs(),
            dry_run = self.is_dry_run(),
            stages = ?self.stages(),
            "starting task execution"
        );
        let ctx = self.create_context();

        for (i, task) in self.tasks.iter().enumerate() {
            if self.is_cancelled() {
                return Err(TaskError::Interrupted(task.name().to_string()).into());
            }

            tracing::info!(
                task = %task.name(),
                index = i + 1,
                total = self.task_count(),
                "running task"
            );

            task.run(&ctx)
                .await
                .with_context(|| format!("task '{}' failed", task.name()))?;
        }

        tracing::info!("all tasks completed");
        Ok(())
    }
}
