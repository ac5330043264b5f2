// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Module configuration and resolution.
//!
//! ```text
//! [modules.<name>] (all fields optional)
//!        +  conventions (root, paths, project)
//!        |
//!        v
//!      Module  (fully resolved, immutable)
//!
//! conventions:
//!   dir        root/<name>
//!   classes    dir/build/classes/java/main
//!   resources  dir/src/main/resources
//!   staging    paths.staging/<name>
//!   archive    paths.libs/<project>-<name>-<version>.jar
//! ```
//!
//! Only explicitly set fields (`Some`) replace conventions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::paths::PathsConfig;
use super::types::ProjectConfig;

/// Per-module configuration as written in TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Module source directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Shell command that compiles the module. Unset means prebuilt classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile: Option<String>,
    /// Sibling modules needed on the compile classpath.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_only: Option<Vec<String>>,
    /// Compiled classes directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<PathBuf>,
    /// Resource source directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<PathBuf>,
    /// Globs selecting resource files that get token substitution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<String>>,
    /// Tokens visible to this module's templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<String>>,
    /// Output archive path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<PathBuf>,
}

impl ModuleConfig {
    fn conventional(templates: &[&str], tokens: &[&str], compile_only: &[&str]) -> Self {
        let owned = |items: &[&str]| items.iter().map(ToString::to_string).collect::<Vec<_>>();
        Self {
            templates: Some(owned(templates)),
            tokens: Some(owned(tokens)),
            compile_only: Some(owned(compile_only)),
            ..Self::default()
        }
    }
}

/// The default three-module layout: shared api, Fabric and Paper.
#[must_use]
pub fn default_modules() -> BTreeMap<String, ModuleConfig> {
    let mut modules = BTreeMap::new();
    modules.insert(
        "api".to_string(),
        ModuleConfig::conventional(&[], &["version"], &[]),
    );
    modules.insert(
        "fabric".to_string(),
        ModuleConfig::conventional(
            &["fabric.mod.json"],
            &["version", "minecraft", "fabricloader"],
            &["api"],
        ),
    );
    modules.insert(
        "paper".to_string(),
        ModuleConfig::conventional(&["plugin.yml"], &["version", "minecraft"], &["api"]),
    );
    modules
}

/// A fully resolved module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    enabled: bool,
    dir: PathBuf,
    compile: Option<String>,
    compile_only: Vec<String>,
    classes: PathBuf,
    resources: PathBuf,
    staging: PathBuf,
    templates: Vec<String>,
    tokens: Vec<String>,
    archive: PathBuf,
}

impl Module {
    /// Resolves a module's configuration against project conventions.
    #[must_use]
    pub fn resolve(
        name: &str,
        config: &ModuleConfig,
        project: &ProjectConfig,
        paths: &PathsConfig,
    ) -> Self {
        let dir = config
            .dir
            .as_deref()
            .map_or_else(|| paths.root().join(name), |d| paths.under_root(d));
        let under_dir = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        };

        Self {
            name: name.to_string(),
            enabled: config.enabled.unwrap_or(true),
            compile: config.compile.clone(),
            compile_only: config.compile_only.clone().unwrap_or_default(),
            classes: config.classes.as_deref().map_or_else(
                || dir.join("build").join("classes").join("java").join("main"),
                under_dir,
            ),
            resources: config.resources.as_deref().map_or_else(
                || dir.join("src").join("main").join("resources"),
                under_dir,
            ),
            staging: paths.staging_dir().join(name),
            templates: config.templates.clone().unwrap_or_default(),
            tokens: config
                .tokens
                .clone()
                .unwrap_or_else(|| vec!["version".to_string()]),
            archive: config.archive.as_deref().map_or_else(
                || {
                    paths
                        .libs_dir()
                        .join(format!("{}-{name}-{}.jar", project.name, project.version))
                },
                |a| paths.under_root(a),
            ),
            dir,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn compile_command(&self) -> Option<&str> {
        self.compile.as_deref()
    }

    #[must_use]
    pub fn compile_only(&self) -> &[String] {
        &self.compile_only
    }

    #[must_use]
    pub fn classes_dir(&self) -> &Path {
        &self.classes
    }

    #[must_use]
    pub fn resources_dir(&self) -> &Path {
        &self.resources
    }

    /// Where templated resources are written before packaging.
    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        &self.staging
    }

    #[must_use]
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn archive(&self) -> &Path {
        &self.archive
    }
}
