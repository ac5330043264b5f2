// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for modpipe.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults (api + fabric + paper layout)
//! 2. modpipe.toml (cwd, optional)
//! 3. --ini FILE...
//! 4. MODPIPE_* env vars
//! 5. --set section/key=value and dedicated CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! MODPIPE_GLOBAL__DRY=true               → global.dry = true
//! MODPIPE_PROJECT__VERSION=1.2.0         → project.version = "1.2.0"
//! MODPIPE_GLOBAL__OUTPUT_LOG_LEVEL=4     → global.output_log_level = 4
//! ```
//!
//! # Module Overrides
//!
//! ```toml
//! [modules.fabric]
//! compile = "./gradlew :fabric:classes"
//!
//! [modules.paper]
//! enabled = false
//! ```
//!
//! Declared modules are laid over the default layout field by field.

pub mod loader;
pub mod module;
pub mod paths;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use module::{Module, ModuleConfig, default_modules};
use paths::PathsConfig;
use types::{GlobalConfig, MergeConfig, ProjectConfig, PublishConfig, VersionsConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub project: ProjectConfig,
    /// Version catalog, exposed to templates as tokens.
    pub versions: VersionsConfig,
    /// Per-module overrides of the default layout.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modules: BTreeMap<String, ModuleConfig>,
    pub merge: MergeConfig,
    pub publish: PublishConfig,
    pub paths: PathsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use modpipe::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("modpipe.toml")
    ///     .with_env_prefix("MODPIPE")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML, does not match the
    /// `Config` structure or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Module configurations after laying `[modules.*]` over the defaults.
    #[must_use]
    pub fn module_configs(&self) -> BTreeMap<String, ModuleConfig> {
        let mut merged = default_modules();
        for (name, config) in &self.modules {
            let entry = merged.entry(name.clone()).or_default();
            *entry = overlay(entry, config);
        }
        merged
    }

    /// All modules, resolved, in name order.
    #[must_use]
    pub fn modules(&self) -> Vec<Module> {
        self.module_configs()
            .iter()
            .map(|(name, config)| Module::resolve(name, config, &self.project, &self.paths))
            .collect()
    }

    /// One resolved module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<Module> {
        self.module_configs()
            .get(name)
            .map(|config| Module::resolve(name, config, &self.project, &self.paths))
    }

    /// Path of the merged root archive.
    #[must_use]
    pub fn merge_output(&self) -> PathBuf {
        self.merge.output.as_deref().map_or_else(
            || {
                self.paths.libs_dir().join(format!(
                    "{}-{}.jar",
                    self.project.name, self.project.version
                ))
            },
            |p| self.paths.under_root(p),
        )
    }

    /// Project slug on the distribution service.
    #[must_use]
    pub fn publish_project(&self) -> &str {
        self.publish.project.as_deref().unwrap_or(&self.project.name)
    }

    /// Game versions targeted by an upload.
    #[must_use]
    pub fn game_versions(&self) -> Vec<String> {
        if self.publish.game_versions.is_empty() {
            self.versions
                .get("minecraft")
                .map(|v| vec![v.to_string()])
                .unwrap_or_default()
        } else {
            self.publish.game_versions.clone()
        }
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an empty project identity, a merge order
    /// naming unknown or disabled modules, unknown compile-only dependencies
    /// or a zero job count.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.paths.resolve();

        for (key, value) in [
            ("name", &self.project.name),
            ("version", &self.project.version),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingKey {
                    section: "project".to_string(),
                    key: key.to_string(),
                }
                .into());
            }
        }

        if self.global.jobs == Some(0) {
            return Err(invalid("global", "jobs", "must be at least 1").into());
        }

        let modules = self.module_configs();
        self.validate_merge_order(&modules)?;

        for (name, config) in &modules {
            for dep in config.compile_only.iter().flatten() {
                if !modules.contains_key(dep) {
                    return Err(invalid(
                        &format!("modules.{name}"),
                        "compile_only",
                        &format!("unknown module '{dep}'"),
                    )
                    .into());
                }
            }
        }

        Ok(())
    }

    fn validate_merge_order(&self, modules: &BTreeMap<String, ModuleConfig>) -> Result<()> {
        if self.merge.order.is_empty() {
            return Err(invalid("merge", "order", "at least one module is required").into());
        }

        let mut seen = BTreeSet::new();
        for name in &self.merge.order {
            let Some(config) = modules.get(name) else {
                return Err(invalid("merge", "order", &format!("unknown module '{name}'")).into());
            };
            if config.enabled == Some(false) {
                return Err(
                    invalid("merge", "order", &format!("module '{name}' is disabled")).into(),
                );
            }
            if !seen.insert(name) {
                return Err(
                    invalid("merge", "order", &format!("module '{name}' listed twice")).into(),
                );
            }
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_project_options(&mut options);
        self.format_module_options(&mut options);
        self.format_merge_options(&mut options);
        self.format_publish_options(&mut options);
        self.format_paths_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert(
            "global.log_format".into(),
            self.global.log_format.to_string(),
        );
        if let Some(jobs) = self.global.jobs {
            options.insert("global.jobs".into(), jobs.to_string());
        }
    }

    fn format_project_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("project.name".into(), self.project.name.clone());
        options.insert("project.version".into(), self.project.version.clone());
        for (key, value) in self.versions.iter() {
            options.insert(format!("versions.{key}"), value.to_string());
        }
    }

    fn format_module_options(&self, options: &mut BTreeMap<String, String>) {
        for module in self.modules() {
            let prefix = format!("modules.{}", module.name());
            options.insert(format!("{prefix}.enabled"), module.enabled().to_string());
            options.insert(
                format!("{prefix}.compile"),
                module.compile_command().unwrap_or_default().to_string(),
            );
            options.insert(
                format!("{prefix}.compile_only"),
                module.compile_only().join(", "),
            );
            options.insert(format!("{prefix}.templates"), module.templates().join(", "));
            options.insert(format!("{prefix}.tokens"), module.tokens().join(", "));
            options.insert(
                format!("{prefix}.archive"),
                module.archive().display().to_string(),
            );
        }
    }

    fn format_merge_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("merge.order".into(), self.merge.order.join(", "));
        options.insert("merge.conflicts".into(), self.merge.conflicts.to_string());
        options.insert(
            "merge.output".into(),
            self.merge_output().display().to_string(),
        );
    }

    fn format_publish_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("publish.api_url".into(), self.publish.api_url.clone());
        options.insert("publish.project".into(), self.publish_project().to_string());
        options.insert(
            "publish.version_type".into(),
            self.publish.version_type.to_string(),
        );
        options.insert(
            "publish.game_versions".into(),
            self.game_versions().join(", "),
        );
        options.insert("publish.loaders".into(), self.publish.loaders.join(", "));
        options.insert(
            "publish.dependencies".into(),
            self.publish.dependencies.join(", "),
        );
        options.insert("publish.featured".into(), self.publish.featured.to_string());
        options.insert("publish.token_env".into(), self.publish.token_env.clone());
        options.insert(
            "publish.changelog_env".into(),
            self.publish.changelog_env.clone(),
        );
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("paths.root".into(), self.paths.root().display().to_string());
        options.insert(
            "paths.build".into(),
            self.paths.build_dir().display().to_string(),
        );
        options.insert(
            "paths.libs".into(),
            self.paths.libs_dir().display().to_string(),
        );
        options.insert(
            "paths.staging".into(),
            self.paths.staging_dir().display().to_string(),
        );
    }
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Lays `over` on top of `base`; only `Some` fields replace.
fn overlay(base: &ModuleConfig, over: &ModuleConfig) -> ModuleConfig {
    ModuleConfig {
        enabled: over.enabled.or(base.enabled),
        dir: over.dir.clone().or_else(|| base.dir.clone()),
        compile: over.compile.clone().or_else(|| base.compile.clone()),
        compile_only: over
            .compile_only
            .clone()
            .or_else(|| base.compile_only.clone()),
        classes: over.classes.clone().or_else(|| base.classes.clone()),
        resources: over.resources.clone().or_else(|| base.resources.clone()),
        templates: over.templates.clone().or_else(|| base.templates.clone()),
        tokens: over.tokens.clone().or_else(|| base.tokens.clone()),
        archive: over.archive.clone().or_else(|| base.archive.clone()),
    }
}
