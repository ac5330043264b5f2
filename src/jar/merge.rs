// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fan-in of module archives into one distributable archive.
//!
//! ```text
//! api.jar  fabric.jar  paper.jar       (merge order)
//!    |         |           |
//!    +----+----+-----+-----+
//!         v          v
//!    file entries  MANIFEST.MF
//!    last wins     imported, last wins
//!         |          |
//!         |     root attributes
//!         |     Implementation-Version, Git-Commit
//!         v          v
//!       ArchiveWriter --> temp file --> persist(output)
//! ```
//!
//! Inputs are resolved before anything is read; a missing input leaves no
//! output behind.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use bon::Builder;
use tracing::{debug, info, warn};

use super::manifest::{MANIFEST_PATH, Manifest};
use super::writer::ArchiveWriter;
use crate::config::types::ConflictPolicy;
use crate::error::{ArchiveError, Result};

pub const IMPLEMENTATION_VERSION: &str = "Implementation-Version";
pub const GIT_COMMIT: &str = "Git-Commit";

/// One archive to merge, owned by a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeInput {
    pub module: String,
    pub path: PathBuf,
}

impl MergeInput {
    pub fn new(module: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            module: module.into(),
            path: path.into(),
        }
    }
}

/// Outcome of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub output: PathBuf,
    /// File entries written, manifest excluded.
    pub entries: usize,
    /// Paths whose content was replaced by a later input.
    pub overwritten: Vec<String>,
}

/// Merges module archives in order.
#[derive(Debug, Clone, Builder)]
pub struct ArchiveMerger {
    #[builder(setters(name = with_inputs))]
    inputs: Vec<MergeInput>,
    #[builder(setters(name = with_output), into)]
    output: PathBuf,
    #[builder(setters(name = with_version), into)]
    version: String,
    #[builder(setters(name = with_commit))]
    commit: Option<String>,
    #[builder(setters(name = with_conflicts), default)]
    conflicts: ConflictPolicy,
}

impl ArchiveMerger {
    #[must_use]
    pub fn inputs(&self) -> &[MergeInput] {
        &self.inputs
    }

    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Fails with `ArchiveError::Unresolved` for the first missing input.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn resolve(&self) -> Result<()> {
        for input in &self.inputs {
            if !input.path.is_file() {
                return Err(ArchiveError::Unresolved {
                    module: input.module.clone(),
                    path: input.path.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Builds the merged contents in memory without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error for unresolved or unreadable inputs, malformed
    /// manifests, or a conflict under [`ConflictPolicy::Fail`].
    pub fn assemble(&self) -> Result<(ArchiveWriter, Vec<String>)> {
        self.resolve()?;

        let mut writer = ArchiveWriter::new(Manifest::new());
        let mut owners: BTreeMap<String, &str> = BTreeMap::new();
        let mut overwritten = Vec::new();

        for input in &self.inputs {
            let (manifest, files) = read_archive(&input.path)?;
            if let Some(manifest) = manifest {
                writer.manifest_mut().import(&manifest);
            }
            debug!(module = %input.module, archive = %input.path.display(), files = files.len(), "merging input");

            for (path, bytes) in files {
                let previous = owners.insert(path.clone(), input.module.as_str());
                let Some(replaced) = writer.insert(path.clone(), bytes) else {
                    continue;
                };
                if writer.entry(&path) == Some(replaced.as_slice()) {
                    continue;
                }
                let previous = previous.unwrap_or_default().to_string();
                match self.conflicts {
                    ConflictPolicy::Overwrite => {
                        debug!(entry = %path, module = %input.module, previous = %previous, "overwriting entry");
                    }
                    ConflictPolicy::Warn => {
                        warn!(entry = %path, module = %input.module, previous = %previous, "overwriting entry");
                    }
                    ConflictPolicy::Fail => {
                        return Err(ArchiveError::Conflict {
                            entry: path,
                            module: input.module.clone(),
                            previous,
                        }
                        .into());
                    }
                }
                overwritten.push(path);
            }
        }

        let root = writer.manifest_mut().main_mut();
        root.insert(IMPLEMENTATION_VERSION, self.version.as_str());
        if let Some(commit) = &self.commit {
            root.insert(GIT_COMMIT, commit.as_str());
        }

        Ok((writer, overwritten))
    }

    /// Merges and writes the output atomically.
    ///
    /// # Errors
    ///
    /// See [`Self::assemble`]; write failures are `ArchiveError::WriteFailed`.
    pub fn merge(&self) -> Result<MergeReport> {
        let (writer, overwritten) = self.assemble()?;
        writer.write_to(&self.output)?;
        info!(
            archive = %self.output.display(),
            inputs = self.inputs.len(),
            entries = writer.len(),
            overwritten = overwritten.len(),
            "merged archive"
        );
        Ok(MergeReport {
            output: self.output.clone(),
            entries: writer.len(),
            overwritten,
        })
    }
}

type ArchiveContents = (Option<Manifest>, Vec<(String, Vec<u8>)>);

/// Reads manifest and file entries of an archive, in archive order.
///
/// # Errors
///
/// Returns `ArchiveError::Invalid` when the file is not a zip archive or an
/// entry escapes the archive root.
pub fn read_archive(path: &Path) -> Result<ArchiveContents> {
    let invalid = |message: String| ArchiveError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    let file = std::fs::File::open(path).map_err(|e| invalid(e.to_string()))?;
    let mut archive =
        zip::ZipArchive::new(std::io::BufReader::new(file)).map_err(|e| invalid(e.to_string()))?;

    let mut manifest = None;
    let mut files = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| invalid(e.to_string()))?;
        if entry.is_dir() {
            continue;
        }
        if entry.enclosed_name().is_none() {
            return Err(invalid(format!("unsafe entry name '{}'", entry.name())).into());
        }
        let name = entry.name().to_string();
        let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or_default());
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| invalid(format!("{name}: {e}")))?;

        if name.eq_ignore_ascii_case(MANIFEST_PATH) {
            manifest = Some(Manifest::parse(
                &bytes,
                &format!("{}!/{name}", path.display()),
            )?);
        } else {
            files.push((name, bytes));
        }
    }
    Ok((manifest, files))
}
