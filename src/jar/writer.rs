// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use super::manifest::{MANIFEST_PATH, Manifest};
use crate::error::{ArchiveError, Result};
use crate::utility::fs::walk::tree_files;

const FILE_MODE: u32 = 0o644;
const DIR_MODE: u32 = 0o755;

/// In-memory archive contents, written in one deterministic pass.
///
/// Entries are kept sorted by path. Directory entries are derived from the
/// file paths, so callers only insert files.
#[derive(Debug, Clone, Default)]
pub struct ArchiveWriter {
    manifest: Manifest,
    entries: BTreeMap<String, Vec<u8>>,
}

impl ArchiveWriter {
    #[must_use]
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            entries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub const fn manifest_mut(&mut self) -> &mut Manifest {
        &mut self.manifest
    }

    #[must_use]
    pub fn entry(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a file, returning the bytes it replaced.
    ///
    /// The manifest path is not a regular entry; use [`Self::manifest_mut`].
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) -> Option<Vec<u8>> {
        self.entries.insert(path.into(), bytes)
    }

    /// Adds every file under `root`, keyed by its relative path.
    ///
    /// A `META-INF/MANIFEST.MF` found in the tree is imported into the
    /// manifest instead of being stored as a file.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or the tree manifest is malformed.
    pub fn add_tree(&mut self, root: &Path) -> Result<usize> {
        let files = tree_files(root)?;
        let count = files.len();
        for file in files {
            let bytes = std::fs::read(&file.path).map_err(|e| ArchiveError::Invalid {
                path: file.path.clone(),
                message: e.to_string(),
            })?;
            if file.relative == MANIFEST_PATH {
                let manifest = Manifest::parse(&bytes, &file.path.display().to_string())?;
                self.manifest.import(&manifest);
            } else {
                self.entries.insert(file.relative, bytes);
            }
        }
        debug!(root = %root.display(), files = count, "added tree");
        Ok(count)
    }

    /// Writes the archive to `output` atomically.
    ///
    /// Layout: `META-INF/`, `META-INF/MANIFEST.MF`, then every other directory
    /// and file in path order. Timestamps are fixed at 1980-01-01 and
    /// permissions at 0644/0755, so equal contents give equal bytes.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::WriteFailed` if any step fails; `output` is
    /// then left untouched.
    pub fn write_to(&self, output: &Path) -> Result<PathBuf> {
        let failed = |message: String| ArchiveError::WriteFailed {
            path: output.to_path_buf(),
            message,
        };

        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;

        let temp = tempfile::Builder::new()
            .prefix(".modpipe-")
            .suffix(".jar.tmp")
            .tempfile_in(parent)
            .map_err(|e| failed(e.to_string()))?;

        let writer = BufWriter::new(temp.as_file());
        self.write_zip(writer).map_err(|e| failed(e.to_string()))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| failed(e.to_string()))?;
        temp.persist(output).map_err(|e| failed(e.error.to_string()))?;

        debug!(archive = %output.display(), entries = self.entries.len(), "wrote archive");
        Ok(output.to_path_buf())
    }

    fn write_zip<W: Write + std::io::Seek>(&self, sink: W) -> zip::result::ZipResult<()> {
        let base = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());
        let file_options = base.unix_permissions(FILE_MODE);
        let dir_options = base.unix_permissions(DIR_MODE);

        let mut zip = ZipWriter::new(sink);
        zip.add_directory("META-INF/", dir_options)?;
        zip.start_file(MANIFEST_PATH, file_options)?;
        zip.write_all(&self.manifest.to_bytes())?;

        let mut written_dirs = BTreeSet::from(["META-INF/".to_string()]);
        for (path, bytes) in &self.entries {
            for dir in parent_dirs(path) {
                if written_dirs.insert(dir.clone()) {
                    zip.add_directory(dir, dir_options)?;
                }
            }
            zip.start_file(path.as_str(), file_options)?;
            zip.write_all(bytes)?;
        }

        let mut sink = zip.finish()?;
        sink.flush()?;
        Ok(())
    }
}

/// `a/b/c.txt` -> `["a/", "a/b/"]`
fn parent_dirs(path: &str) -> Vec<String> {
    path.match_indices('/')
        .map(|(i, _)| path[..=i].to_string())
        .collect()
}
