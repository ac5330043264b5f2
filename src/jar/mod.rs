// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Java archive handling.
//!
//! ```text
//! manifest   META-INF/MANIFEST.MF parse/write, 72-byte lines, CRLF
//! writer     deterministic zip output, atomic persist
//! merge      ordered fan-in, last writer wins
//! ```

pub mod manifest;
pub mod merge;
pub mod writer;

pub use manifest::{Attributes, MANIFEST_PATH, Manifest};
pub use merge::{ArchiveMerger, MergeInput, MergeReport, read_archive};
pub use writer::ArchiveWriter;

#[cfg(test)]
mod tests;
