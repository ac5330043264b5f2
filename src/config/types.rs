// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Config: GlobalConfig, ProjectConfig, VersionsConfig, MergeConfig, PublishConfig
//! ConflictPolicy: overwrite (default) | warn | fail
//! VersionType:    alpha (default) | beta | release
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::{LogFormat, LogLevel};

/// Global options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log intended actions instead of performing them.
    pub dry: bool,
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Log file format.
    pub log_format: LogFormat,
    /// Maximum number of modules compiled at once (default: CPU count).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_format: LogFormat::Text,
            jobs: None,
        }
    }
}

/// Project identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Root project name; prefixes every archive name.
    pub name: String,
    /// Version string shared by every module.
    pub version: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "guithium".to_string(),
            version: "0.1.0".to_string(),
        }
    }
}

/// Version catalog. Every entry is a template token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionsConfig(pub BTreeMap<String, String>);

impl Default for VersionsConfig {
    fn default() -> Self {
        let mut versions = BTreeMap::new();
        versions.insert("minecraft".to_string(), "1.21.4".to_string());
        versions.insert("fabricloader".to_string(), "0.16.10".to_string());
        versions.insert("java".to_string(), "21".to_string());
        Self(versions)
    }
}

impl VersionsConfig {
    /// Looks up a catalog entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates catalog entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// How the merger reports paths supplied by more than one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Last writer wins, logged at debug level.
    #[default]
    Overwrite,
    /// Last writer wins, each overwrite logged as a warning.
    Warn,
    /// Any overwrite with different content aborts the merge.
    Fail,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Overwrite => "overwrite",
            Self::Warn => "warn",
            Self::Fail => "fail",
        })
    }
}

impl std::str::FromStr for ConflictPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "warn" => Ok(Self::Warn),
            "fail" => Ok(Self::Fail),
            _ => Err(ConfigError::InvalidValue {
                section: "merge".to_string(),
                key: "conflicts".to_string(),
                message: format!("expected 'overwrite', 'warn' or 'fail', got '{s}'"),
            }),
        }
    }
}

/// Artifact merger options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// Modules merged into the root archive, in precedence order (last wins).
    pub order: Vec<String>,
    /// Overwrite reporting.
    pub conflicts: ConflictPolicy,
    /// Output path (default: `<libs>/<name>-<version>.jar`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            order: vec!["api".to_string(), "fabric".to_string(), "paper".to_string()],
            conflicts: ConflictPolicy::default(),
            output: None,
        }
    }
}

/// Release channel reported to the distribution service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    #[default]
    Alpha,
    Beta,
    Release,
}

impl fmt::Display for VersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Release => "release",
        })
    }
}

/// Modrinth publishing options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// API base URL.
    pub api_url: String,
    /// Project slug or id (default: project name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub version_type: VersionType,
    /// Target game versions (default: `versions.minecraft`).
    pub game_versions: Vec<String>,
    pub loaders: Vec<String>,
    /// Projects declared as required dependencies. Never inferred.
    pub dependencies: Vec<String>,
    /// Mark the uploaded version as featured.
    pub featured: bool,
    /// Environment variable holding the upload token.
    pub token_env: String,
    /// Environment variable holding the changelog.
    pub changelog_env: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.modrinth.com/v2".to_string(),
            project: None,
            version_type: VersionType::Alpha,
            game_versions: Vec::new(),
            loaders: vec![
                "paper".to_string(),
                "purpur".to_string(),
                "fabric".to_string(),
            ],
            dependencies: vec!["fabric-api".to_string()],
            featured: false,
            token_env: "MODRINTH_TOKEN".to_string(),
            changelog_env: "COMMIT_MESSAGE".to_string(),
        }
    }
}
