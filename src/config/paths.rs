// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! root/
//!   <module>/                 module sources (per-module config)
//!   build/
//!     libs/                   module archives, merged archive
//!     staging/<module>/       templated resources
//! ```
//!
//! Relative paths are resolved against `root`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Project root (default: current directory).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Build output directory (default: root/build).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<PathBuf>,
    /// Archive output directory (default: build/libs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libs: Option<PathBuf>,
    /// Staged resource directory (default: build/staging).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging: Option<PathBuf>,
}

impl PathsConfig {
    /// Resolve all relative paths against the root and fill in defaults.
    pub fn resolve(&mut self) {
        let root = self.root.clone().unwrap_or_else(|| PathBuf::from("."));

        let resolve = |path: &mut Option<PathBuf>, parent: &Path, default: &str| match path {
            Some(p) if p.is_relative() => *path = Some(parent.join(&*p)),
            None => *path = Some(parent.join(default)),
            _ => {}
        };

        resolve(&mut self.build, &root, "build");
        let build = self.build.clone().unwrap_or_else(|| root.join("build"));

        resolve(&mut self.libs, &build, "libs");
        resolve(&mut self.staging, &build, "staging");
        self.root = Some(root);
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Build directory.
    #[must_use]
    pub fn build_dir(&self) -> PathBuf {
        self.build.clone().unwrap_or_else(|| self.root().join("build"))
    }

    /// Archive directory.
    #[must_use]
    pub fn libs_dir(&self) -> PathBuf {
        self.libs.clone().unwrap_or_else(|| self.build_dir().join("libs"))
    }

    /// Staging directory.
    #[must_use]
    pub fn staging_dir(&self) -> PathBuf {
        self.staging
            .clone()
            .unwrap_or_else(|| self.build_dir().join("staging"))
    }

    /// Resolves `path` against the root unless it is absolute.
    #[must_use]
    pub fn under_root(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root().join(path)
        }
    }
}
