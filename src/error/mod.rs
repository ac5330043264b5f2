// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                  PipeError (<= 24 bytes)
//!                        |
//!   +-------+-------+----+----+------+------+------+-----------+
//!   v       v       v         v      v      v      v           v
//! Templ  Archive Publish    Cfg   Task   Proc   Git   Fs/Io/Other
//!  Box     Box     Box      Box   Box    Box    Box     Box
//!
//! Failure classes:
//!   resolution  ArchiveError::Unresolved, ConfigError (dependency cycle)
//!   template    TemplateError            (aborts packaging of the module)
//!   publish     PublishError             (aborts the publish stage only)
//!
//! Nothing is retried.
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`PipeError`].
pub type PipeResult<T> = std::result::Result<T, PipeError>;

/// Top-level application error type. Every payload is boxed.
#[derive(Debug, Error)]
pub enum PipeError {
    /// Token substitution failed.
    #[error("template error: {0}")]
    Template(#[from] Box<TemplateError>),

    /// Archive resolution, packaging or merging failed.
    #[error("archive error: {0}")]
    Archive(#[from] Box<ArchiveError>),

    /// Upload to the distribution service failed.
    #[error("publish error: {0}")]
    Publish(#[from] Box<PublishError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Task execution error.
    #[error("task error: {0}")]
    Task(#[from] Box<TaskError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Git query failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for PipeError {
                fn from(err: $error) -> Self {
                    PipeError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    TemplateError => Template,
    ArchiveError => Archive,
    PublishError => Publish,
    ConfigError => Config,
    TaskError => Task,
    ProcessError => Process,
    GitError => Git,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Template Errors ---

/// Resource templating errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A placeholder references a token with no bound value.
    #[error("unbound token '{token}' in {file}")]
    UnboundToken { token: String, file: String },

    /// A `${` placeholder is never closed.
    #[error("unterminated placeholder at byte {offset} in {file}")]
    Unterminated { offset: usize, file: String },

    /// A designated template file is not valid UTF-8.
    #[error("{file} is not valid UTF-8: {message}")]
    Encoding { file: String, message: String },

    /// A template file pattern failed to compile.
    #[error("invalid template pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

// --- Archive Errors ---

/// Archive resolution, packaging and merge errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A declared input could not be resolved to an existing file.
    #[error("unresolved input for module '{module}': {path} does not exist")]
    Unresolved { module: String, path: PathBuf },

    /// The input exists but is not a readable archive.
    #[error("invalid archive {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    /// Two inputs supply different content for the same path.
    #[error("'{entry}' from '{module}' overwrites content from '{previous}'")]
    Conflict {
        entry: String,
        module: String,
        previous: String,
    },

    /// A manifest could not be parsed.
    #[error("malformed manifest in {origin} at line {line}: {message}")]
    Manifest {
        origin: String,
        line: usize,
        message: String,
    },

    /// Writing the output archive failed.
    #[error("failed to write {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },
}

// --- Publish Errors ---

/// Distribution-service upload errors.
#[derive(Debug, Error)]
pub enum PublishError {
    /// No credential was available when the upload ran.
    #[error("no upload token: environment variable {variable} is not set")]
    MissingToken { variable: String },

    /// A project slug could not be resolved.
    #[error("project '{slug}' not found on the distribution service")]
    ProjectNotFound { slug: String },

    /// The service refused the upload.
    #[error("upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Transport-level failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The archive to upload is missing.
    #[error("archive to publish not found: {0}")]
    ArchiveMissing(PathBuf),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Task Errors ---

/// Task execution errors.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Task was not found.
    #[error("task '{0}' not found")]
    NotFound(String),

    /// Task was interrupted.
    #[error("task '{0}' was interrupted")]
    Interrupted(String),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },
}

// --- Git Errors ---

/// Source-control query errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found at the specified path.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from the gix library.
    #[error("gix error: {0}")]
    Gix(String),
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),
}
