// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build, merge and publish command implementation.
//!
//! ```text
//! modules --> registry.resolve --> with_dependencies --> waves
//!   wave 1: [api]            Task::Parallel(ModuleTask...)
//!   wave 2: [fabric, paper]  Task::Parallel(ModuleTask...)
//!   Task::Merge              if MERGE selected
//!   Task::Publish            if PUBLISH selected
//! ```

use std::sync::Arc;

use crate::build_info::BuildInfo;
use crate::cli::build::{BuildArgs, PublishArgs};
use crate::config::Config;
use crate::error::{Result, TaskError};
use crate::task::manager::TaskManager;
use crate::task::registry::TaskRegistry;
use crate::task::tasks::merge::MergeTask;
use crate::task::tasks::module::ModuleTask;
use crate::task::tasks::publish::PublishTask;
use crate::task::{ParallelTasks, Stages, Task};

/// Stages performed per module.
const MODULE_STAGES: Stages = Stages::COMPILE
    .union(Stages::TEMPLATE)
    .union(Stages::PACKAGE);

/// How one pipeline run behaves.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Module names or globs; empty selects every enabled module.
    pub modules: Vec<String>,
    pub stages: Stages,
    pub dry_run: bool,
    pub clean: bool,
}

/// Plans the task list for `modules` and `stages`.
///
/// # Errors
///
/// Returns an error if a pattern matches no module, a `compile_only`
/// dependency is unknown, or the dependencies form a cycle.
pub fn plan_tasks(config: &Config, modules: &[String], stages: Stages) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();

    if stages.intersects(MODULE_STAGES) {
        let registry = TaskRegistry::from_config(config);
        let selected = registry.resolve(modules)?;
        let closure = registry.with_dependencies(&selected)?;
        let waves = registry.waves(&closure)?;

        tracing::info!(modules = ?closure, waves = waves.len(), "resolved modules to build");

        for (i, wave) in waves.into_iter().enumerate() {
            let children = wave
                .iter()
                .map(|name| {
                    config
                        .module(name)
                        .map(|module| Task::Module(ModuleTask::new(module)))
                        .ok_or_else(|| TaskError::NotFound(name.clone()))
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            tasks.push(Task::Parallel(ParallelTasks::new(
                format!("compile wave {}", i + 1),
                children,
            )));
        }
    }

    if stages.contains(Stages::MERGE) {
        tasks.push(Task::Merge(MergeTask::new()));
    }
    if stages.contains(Stages::PUBLISH) {
        tasks.push(Task::Publish(PublishTask::new()));
    }

    Ok(tasks)
}

/// Plans and runs one pipeline.
///
/// A Ctrl+C watcher cancels the run between and inside tasks.
///
/// # Errors
///
/// Returns an error if planning fails or any task fails.
pub async fn run_pipeline(
    config: Arc<Config>,
    build: Arc<BuildInfo>,
    options: &PipelineOptions,
) -> Result<()> {
    let tasks = plan_tasks(&config, &options.modules, options.stages)?;

    let mut manager = TaskManager::new(config, build)
        .with_dry_run(options.dry_run)
        .with_clean(options.clean)
        .with_stages(options.stages);

    let cancel_token = manager.cancel_token();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, interrupting tasks...");
            cancel_token.cancel();
        }
    });

    for task in tasks {
        manager.add(task);
    }

    let result = manager.run_all().await;
    watcher.abort();
    result
}

fn resolve_build(config: &Config) -> Arc<BuildInfo> {
    let build = BuildInfo::resolve(config, &config.paths.root());
    match build.commit() {
        Some(commit) => tracing::debug!(version = %build.version(), commit, "resolved build info"),
        None => tracing::warn!(version = %build.version(), "no commit hash available"),
    }
    Arc::new(build)
}

fn report(result: Result<()>, what: &str) -> Result<()> {
    match result {
        Ok(()) => {
            tracing::info!("{what} completed successfully");
            Ok(())
        }
        Err(e) => {
            eprintln!("{what} failed: {e}");
            Err(e)
        }
    }
}

/// Main handler for the build command.
///
/// # Errors
///
/// Returns an error if module resolution fails or the build fails.
pub async fn run_build_command(args: &BuildArgs, config: &Config, dry_run: bool) -> Result<()> {
    let options = PipelineOptions {
        modules: args.modules.clone(),
        stages: args.stages(),
        dry_run,
        clean: args.clean,
    };
    let result = run_pipeline(Arc::new(config.clone()), resolve_build(config), &options).await;
    report(result, "Build")
}

/// Main handler for the merge command.
///
/// # Errors
///
/// Returns an error if a module archive is missing or the merge fails.
pub async fn run_merge_command(config: &Config, dry_run: bool) -> Result<()> {
    let options = PipelineOptions {
        stages: Stages::MERGE,
        dry_run,
        ..PipelineOptions::default()
    };
    let result = run_pipeline(Arc::new(config.clone()), resolve_build(config), &options).await;
    report(result, "Merge")
}

/// Main handler for the publish command.
///
/// # Errors
///
/// Returns an error if the build fails, the token is missing, or the upload
/// is rejected.
pub async fn run_publish_command(args: &PublishArgs, config: &Config, dry_run: bool) -> Result<()> {
    let options = PipelineOptions {
        modules: args.build.modules.clone(),
        stages: args.stages(),
        dry_run,
        clean: args.build.clean && !args.skip_build,
    };
    let result = run_pipeline(Arc::new(config.clone()), resolve_build(config), &options).await;
    report(result, "Publish")
}
