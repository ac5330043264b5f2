// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build-wide values resolved once per invocation.
//!
//! ```text
//! Config.project + Config.versions + git HEAD
//!                  |
//!                  v
//!      BuildInfo { name, version, commit, tokens }
//!                  |
//!        Arc<BuildInfo> passed to every task
//! ```
//!
//! Nothing reads the version or commit from ambient state after this point.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Config;
use crate::git;

/// Token values available to resource templates.
pub type Tokens = BTreeMap<String, String>;

/// Immutable project name, version, commit hash and token catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    name: String,
    version: String,
    commit: Option<String>,
    tokens: Tokens,
}

impl BuildInfo {
    /// Assembles build info from explicit values.
    ///
    /// `version` is always bound as a token; catalog entries named `version`
    /// are ignored.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        commit: Option<String>,
        catalog: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let version = version.into();
        let mut tokens: Tokens = catalog.into_iter().collect();
        tokens.insert("version".to_string(), version.clone());
        Self {
            name: name.into(),
            version,
            commit,
            tokens,
        }
    }

    /// Resolves build info from config and the checkout at `root`.
    #[must_use]
    pub fn resolve(config: &Config, root: &Path) -> Self {
        Self::new(
            config.project.name.clone(),
            config.project.version.clone(),
            git::query::head_commit(root),
            config
                .versions
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Commit hash, absent outside a checkout.
    #[must_use]
    pub fn commit(&self) -> Option<&str> {
        self.commit.as_deref()
    }

    #[must_use]
    pub const fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    /// The subset of tokens a module binds. Names without a value are left out
    /// so that templates using them fail as unbound.
    #[must_use]
    pub fn tokens_for(&self, names: &[String]) -> Tokens {
        names
            .iter()
            .filter_map(|name| {
                self.tokens
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
