// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Module archive packing.
//!
//! ```text
//! PackerTool
//!   classes dir  --add_tree-->  ArchiveWriter  --write_to-->  <project>-<module>-<version>.jar
//!   staging dir  --add_tree-->       |   (staged resources win over classes)
//!                                    v
//!   MANIFEST.MF: Manifest-Version, Implementation-Title, Implementation-Version
//!
//! A required source (the classes dir) that does not exist is
//! ArchiveError::Unresolved, whether or not the compile stage ran.
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use super::{BoxFuture, Tool, ToolContext};
use crate::config::module::Module;
use crate::error::{ArchiveError, Result};
use crate::jar::merge::IMPLEMENTATION_VERSION;
use crate::jar::{ArchiveWriter, Manifest};

pub const IMPLEMENTATION_TITLE: &str = "Implementation-Title";

/// Packs a module's classes and staged resources into its archive.
///
/// # Example
///
/// ```ignore
/// let tool = PackerTool::new()
///     .module("fabric")
///     .archive("build/libs/guithium-fabric-1.4.0.jar")
///     .require_source("fabric/build/classes/java/main")
///     .add_source("build/staging/fabric")
///     .title("guithium-fabric")
///     .version("1.4.0");
/// tool.run(&ctx).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackerTool {
    module: Option<String>,
    archive: Option<PathBuf>,
    sources: Vec<PathBuf>,
    /// Sources that must exist; the rest may be absent
    required: Vec<PathBuf>,
    title: Option<String>,
    version: Option<String>,
}

impl PackerTool {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            module: None,
            archive: None,
            sources: Vec::new(),
            required: Vec::new(),
            title: None,
            version: None,
        }
    }

    /// Classes first, then staged resources.
    #[must_use]
    pub fn for_module(module: &Module, project: &str, version: &str) -> Self {
        Self::new()
            .module(module.name())
            .archive(module.archive())
            .require_source(module.classes_dir())
            .add_source(module.staging_dir())
            .title(format!("{project}-{}", module.name()))
            .version(version)
    }

    /// Module named in resolution errors.
    #[must_use]
    pub fn module(mut self, name: impl Into<String>) -> Self {
        self.module = Some(name.into());
        self
    }

    #[must_use]
    pub fn archive(mut self, path: impl AsRef<Path>) -> Self {
        self.archive = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a directory tree; later sources overwrite earlier ones.
    #[must_use]
    pub fn add_source(mut self, path: impl AsRef<Path>) -> Self {
        self.sources.push(path.as_ref().to_path_buf());
        self
    }

    /// Like [`add_source`](Self::add_source), but packing fails with
    /// `ArchiveError::Unresolved` if the directory does not exist.
    #[must_use]
    pub fn require_source(mut self, path: impl AsRef<Path>) -> Self {
        self.required.push(path.as_ref().to_path_buf());
        self.add_source(path)
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    fn get_archive(&self) -> Result<&Path> {
        self.archive
            .as_deref()
            .context("packer: archive path not set")
    }

    fn check_required(&self) -> Result<()> {
        match self.required.iter().find(|path| !path.is_dir()) {
            Some(path) => Err(ArchiveError::Unresolved {
                module: self
                    .module
                    .clone()
                    .or_else(|| self.title.clone())
                    .unwrap_or_default(),
                path: path.clone(),
            }
            .into()),
            None => Ok(()),
        }
    }

    fn manifest(&self) -> Manifest {
        let mut manifest = Manifest::new();
        if let Some(title) = &self.title {
            manifest.main_mut().insert(IMPLEMENTATION_TITLE, title.as_str());
        }
        if let Some(version) = &self.version {
            manifest
                .main_mut()
                .insert(IMPLEMENTATION_VERSION, version.as_str());
        }
        manifest
    }

    /// Builds and writes the archive. Blocking.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::Unresolved` if a required source is missing,
    /// or an error if a source tree cannot be read or the archive cannot be
    /// written. Nothing is written when a required source is missing.
    pub fn pack(&self) -> Result<PathBuf> {
        let archive = self.get_archive()?;
        self.check_required()?;
        let mut writer = ArchiveWriter::new(self.manifest());
        for source in &self.sources {
            writer
                .add_tree(source)
                .with_context(|| format!("failed to add {}", source.display()))?;
        }
        // Values supplied by this tool beat a MANIFEST.MF found in the trees.
        if let Some(version) = &self.version {
            writer
                .manifest_mut()
                .main_mut()
                .insert(IMPLEMENTATION_VERSION, version.as_str());
        }
        writer.write_to(archive)
    }
}

impl Tool for PackerTool {
    fn name(&self) -> &str {
        "packer"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let archive = self.get_archive()?;
            if ctx.is_dry_run() {
                info!(
                    sources = self.sources.len(),
                    "[dry-run] Would pack {}",
                    archive.display()
                );
                return Ok(());
            }

            let tool = self.clone();
            let written = tokio::task::spawn_blocking(move || tool.pack())
                .await
                .context("packer task panicked")??;
            info!(archive = %written.display(), "packed archive");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests;
