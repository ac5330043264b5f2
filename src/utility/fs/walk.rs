// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{FsError, Result};
use flume::unbounded;
use ignore::{DirEntry, WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Walker for packaging: every file counts, hidden or ignored, and symlinks
/// are followed.
fn archive_walker(root: &Path) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false).follow_links(true);
    builder
}

/// Regular files found by [`parallel_walk`], sorted, plus the number of
/// entries that could not be read.
#[derive(Debug, Default)]
pub struct WalkResult {
    files: Vec<PathBuf>,
    error_count: usize,
}

impl WalkResult {
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }
}

/// A file found under a tree root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TreeFile {
    /// Path relative to the root, `/`-separated.
    pub relative: String,
    pub path: PathBuf,
}

fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|ft| ft.is_file())
}

/// Collects every regular file under `root` on the `ignore` thread pool.
///
/// # Errors
///
/// Returns `FsError::NotFound` if `root` does not exist.
pub fn parallel_walk<P: AsRef<Path>>(root: P) -> Result<WalkResult> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(FsError::NotFound(root.display().to_string()).into());
    }

    let (tx, rx) = unbounded::<PathBuf>();
    let errors = Arc::new(AtomicUsize::new(0));

    archive_walker(root).build_parallel().run(|| {
        let tx = tx.clone();
        let errors = Arc::clone(&errors);
        Box::new(move |entry| {
            match entry {
                Ok(entry) if is_file(&entry) => {
                    let _ = tx.send(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "unreadable entry");
                    errors.fetch_add(1, Ordering::Relaxed);
                }
            }
            WalkState::Continue
        })
    });
    drop(tx);

    let mut files: Vec<PathBuf> = rx.into_iter().collect();
    files.sort();
    Ok(WalkResult {
        files,
        error_count: errors.load(Ordering::Relaxed),
    })
}

fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let parts: Vec<_> = path
        .strip_prefix(root)
        .ok()?
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Lists every file under `root` with its `/`-separated relative path,
/// sorted by that path.
///
/// A missing root yields an empty list.
///
/// # Errors
///
/// Returns an error if any entry could not be read; a partial tree must not
/// end up in an archive.
pub fn tree_files<P: AsRef<Path>>(root: P) -> Result<Vec<TreeFile>> {
    let root = root.as_ref();
    if !root.exists() {
        return Ok(Vec::new());
    }

    let walked = parallel_walk(root)?;
    if walked.error_count() > 0 {
        anyhow::bail!(
            "{} entries under {} could not be read",
            walked.error_count(),
            root.display()
        );
    }

    let mut files: Vec<TreeFile> = walked
        .files
        .into_iter()
        .filter_map(|path| {
            let relative = relative_name(root, &path)?;
            Some(TreeFile { relative, path })
        })
        .collect();
    files.sort();
    Ok(files)
}
