// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Compile step: runs a module's compile command and checks its classes.
//!
//! ```text
//! CompileTool
//!   command set?  --> sh -c <command>   (cwd = project root)
//!                     MODPIPE_MODULE             module name
//!                     MODPIPE_VERSION            project version
//!                     MODPIPE_COMPILE_CLASSPATH  compile-only classes dirs
//!   afterwards    --> classes dir must exist
//! ```
//!
//! Without a command the classes directory is taken as prebuilt.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use super::{BoxFuture, Tool, ToolContext};
use crate::config::Config;
use crate::config::module::Module;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{ArchiveError, Result, TaskError};

pub const ENV_MODULE: &str = "MODPIPE_MODULE";
pub const ENV_VERSION: &str = "MODPIPE_VERSION";
pub const ENV_CLASSPATH: &str = "MODPIPE_COMPILE_CLASSPATH";

/// Compiles one module.
///
/// # Example
///
/// ```ignore
/// let tool = CompileTool::new("fabric")
///     .command("./gradlew :fabric:classes")
///     .working_dir("/work/guithium")
///     .classes_dir("/work/guithium/fabric/build/classes/java/main")
///     .add_classpath("/work/guithium/api/build/classes/java/main")
///     .version("1.4.0");
/// tool.run(&ctx).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CompileTool {
    module: String,
    command: Option<String>,
    working_dir: Option<PathBuf>,
    classes_dir: Option<PathBuf>,
    classpath: Vec<PathBuf>,
    version: String,
}

impl CompileTool {
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            command: None,
            working_dir: None,
            classes_dir: None,
            classpath: Vec::new(),
            version: String::new(),
        }
    }

    /// Configures the tool from a resolved module.
    ///
    /// The classpath holds the classes directories of the module's
    /// compile-only dependencies.
    #[must_use]
    pub fn for_module(module: &Module, config: &Config, version: &str) -> Self {
        let classpath = module
            .compile_only()
            .iter()
            .filter_map(|dep| config.module(dep))
            .map(|dep| dep.classes_dir().to_path_buf());

        let mut tool = Self::new(module.name())
            .working_dir(config.paths.root())
            .classes_dir(module.classes_dir())
            .classpath(classpath)
            .version(version);
        if let Some(command) = module.compile_command() {
            tool = tool.command(command);
        }
        tool
    }

    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    #[must_use]
    pub fn working_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.working_dir = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn classes_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.classes_dir = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn add_classpath(mut self, path: impl AsRef<Path>) -> Self {
        self.classpath.push(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn classpath(mut self, paths: impl IntoIterator<Item = impl AsRef<Path>>) -> Self {
        self.classpath = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        self
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn classpath_entries(&self) -> &[PathBuf] {
        &self.classpath
    }

    fn get_classes_dir(&self) -> Result<&Path> {
        self.classes_dir
            .as_deref()
            .context("compile tool: classes directory not set")
    }

    async fn do_compile(&self, ctx: &ToolContext, command: &str) -> Result<()> {
        let classpath = std::env::join_paths(&self.classpath)
            .context("compile classpath contains an invalid path")?;

        let mut process = ProcessBuilder::raw(command)
            .env(ENV_MODULE, self.module.as_str())
            .env(ENV_VERSION, self.version.as_str())
            .env(ENV_CLASSPATH, classpath.to_string_lossy())
            .name(format!("compile {}", self.module));
        if let Some(dir) = &self.working_dir {
            process = process.cwd(dir);
        }

        info!(module = %self.module, command, "compiling");
        let output = process
            .run_with_cancellation(ctx.cancel_token().clone())
            .await?;
        if output.is_interrupted() {
            return Err(TaskError::Interrupted(format!("compile {}", self.module)).into());
        }
        Ok(())
    }

    fn check_classes(&self) -> Result<()> {
        let classes = self.get_classes_dir()?;
        if !classes.is_dir() {
            return Err(ArchiveError::Unresolved {
                module: self.module.clone(),
                path: classes.to_path_buf(),
            }
            .into());
        }
        debug!(module = %self.module, classes = %classes.display(), "classes resolved");
        Ok(())
    }
}

impl Tool for CompileTool {
    fn name(&self) -> &str {
        "compile"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if ctx.is_dry_run() {
                match &self.command {
                    Some(command) => {
                        info!(module = %self.module, command = %command, "[dry-run] Would run compile command");
                    }
                    None => {
                        info!(module = %self.module, "[dry-run] Would use prebuilt classes");
                    }
                }
                return Ok(());
            }

            match &self.command {
                Some(command) => self.do_compile(ctx, command).await?,
                None => debug!(module = %self.module, "no compile command, using prebuilt classes"),
            }
            self.check_classes()
        })
    }
}
