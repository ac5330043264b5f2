// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Module selection and compile ordering.
//!
//! ```text
//! input ["fab*"]
//!   match_pattern:  "fab*" --> [fabric]
//!   with_dependencies:     --> [api, fabric]      (compile_only, transitive)
//!   waves:                 --> [[api], [fabric]]  (dependencies first)
//! ```

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Context;
use wax::{Glob, Program};

use crate::config::Config;
use crate::error::{ConfigError, Result};

/// Registry of enabled modules and their compile-only dependencies.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    /// Module name -> compile-only dependencies.
    modules: BTreeMap<String, BTreeSet<String>>,
}

impl TaskRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            modules: BTreeMap::new(),
        }
    }

    /// Registers every enabled module of `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for module in config.modules().into_iter().filter(|m| m.enabled()) {
            registry.register(module.name(), module.compile_only().iter().cloned());
        }
        registry
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        compile_only: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.modules.insert(
            name.into(),
            compile_only.into_iter().map(Into::into).collect(),
        );
    }

    #[must_use]
    pub fn all_modules(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    /// Matches a module name or glob against registered modules.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob.
    pub fn match_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        if self.modules.contains_key(pattern) {
            return Ok(vec![pattern.to_string()]);
        }

        let glob =
            Glob::new(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;
        Ok(self
            .modules
            .keys()
            .filter(|name| glob.is_match(name.as_str()))
            .cloned()
            .collect())
    }

    /// Resolves patterns to module names; no patterns selects every module.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid glob or a pattern matching nothing.
    pub fn resolve(&self, specs: &[String]) -> Result<Vec<String>> {
        if specs.is_empty() {
            return Ok(self.all_modules());
        }

        let mut seen = BTreeSet::new();
        let mut result = Vec::new();
        for pattern in specs {
            let matches = self.match_pattern(pattern)?;
            if matches.is_empty() {
                anyhow::bail!("pattern '{pattern}' matched no enabled module");
            }
            for name in matches {
                if seen.insert(name.clone()) {
                    result.push(name);
                }
            }
        }
        Ok(result)
    }

    /// Adds the transitive compile-only dependencies of `selected`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a dependency that is not a
    /// registered (enabled) module.
    pub fn with_dependencies(&self, selected: &[String]) -> Result<BTreeSet<String>> {
        let mut closure = BTreeSet::new();
        let mut pending: Vec<String> = selected.to_vec();
        while let Some(name) = pending.pop() {
            if !closure.insert(name.clone()) {
                continue;
            }
            let deps = self.dependencies_of(&name)?;
            for dep in deps {
                if !closure.contains(dep) {
                    tracing::debug!(module = %name, dependency = %dep, "adding compile dependency");
                    pending.push(dep.clone());
                }
            }
        }
        Ok(closure)
    }

    fn dependencies_of(&self, name: &str) -> Result<&BTreeSet<String>> {
        let deps = self.modules.get(name).ok_or_else(|| ConfigError::InvalidValue {
            section: "modules".to_string(),
            key: name.to_string(),
            message: "unknown or disabled module".to_string(),
        })?;
        if let Some(missing) = deps.iter().find(|d| !self.modules.contains_key(*d)) {
            return Err(ConfigError::InvalidValue {
                section: format!("modules.{name}"),
                key: "compile_only".to_string(),
                message: format!("module '{missing}' is unknown or disabled"),
            }
            .into());
        }
        Ok(deps)
    }

    /// Orders `selected` into compile waves: every module comes after all of
    /// its compile-only dependencies. Names inside a wave are sorted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unknown dependencies or a cycle.
    pub fn waves(&self, selected: &BTreeSet<String>) -> Result<Vec<Vec<String>>> {
        let mut remaining: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for name in selected {
            let deps = self.dependencies_of(name)?;
            remaining.insert(
                name.as_str(),
                deps.iter()
                    .map(String::as_str)
                    .filter(|d| selected.contains(*d))
                    .collect(),
            );
        }

        let mut waves = Vec::new();
        while !remaining.is_empty() {
            let ready: Vec<&str> = remaining
                .iter()
                .filter(|(_, deps)| deps.is_empty())
                .map(|(name, _)| *name)
                .collect();

            if ready.is_empty() {
                let cycle = remaining.keys().copied().collect::<Vec<_>>().join(", ");
                return Err(ConfigError::InvalidValue {
                    section: "modules".to_string(),
                    key: "compile_only".to_string(),
                    message: format!("dependency cycle between {cycle}"),
                }
                .into());
            }

            for name in &ready {
                remaining.remove(name);
            }
            for deps in remaining.values_mut() {
                for name in &ready {
                    deps.remove(name);
                }
            }
            waves.push(ready.into_iter().map(String::from).collect());
        }
        Ok(waves)
    }
}
