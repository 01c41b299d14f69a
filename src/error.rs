//! All error types for the lingo crate.
//!
//! Scan-level failures (`PathNotFound`, `PathNotDirectory`, `ReadFailure`) end a
//! scan. Per-file problems (`InvalidFilenameFormat`, `InvalidLocale`,
//! `UnreadableFile`) are collected and reported together as `InvalidFiles`.
//! Registry construction fails fast, and translation failures are recoverable.

use std::path::PathBuf;

use thiserror::Error;

use crate::locale::SUPPORTED_EXTENSIONS;

/// Boxed error produced by a translation backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("translations path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("translations path is not a directory: {}", .0.display())]
    PathNotDirectory(PathBuf),

    #[error("failed to read translations directory {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid translation filename `{file_name}`: {reason}")]
    InvalidFilenameFormat { file_name: String, reason: String },

    #[error("invalid locale `{tag}`: {reason}")]
    InvalidLocale { tag: String, reason: String },

    #[error("unusable translation file `{file_name}`: {reason}")]
    UnreadableFile { file_name: String, reason: String },

    #[error(
        "found {} invalid translation files{}: [{}] (files must follow format 'prefix.{{locale}}.{{ext}}' where ext is one of: {})",
        .files.len(),
        prefix_note(.prefixes),
        .files.join(", "),
        SUPPORTED_EXTENSIONS.join(", ")
    )]
    InvalidFiles {
        files: Vec<String>,
        prefixes: Vec<String>,
    },

    #[error("no translation files were found in path: {}", .0.display())]
    NoCandidates(PathBuf),

    #[error("default locale `{0}` not found in available translation files")]
    DefaultLocaleMissing(String),

    #[error("failed to load translation file {}: {source}", .path.display())]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("default localizer `{0}` not found, please check your translations configuration")]
    DefaultLocalizerMissing(String),

    #[error("message cannot be nil")]
    NilMessage,

    #[error("message ID cannot be empty")]
    EmptyMessageId,

    #[error("failed to localize message '{id}': {source}")]
    Translate {
        id: String,
        #[source]
        source: BoxError,
    },
}

fn prefix_note(prefixes: &[String]) -> String {
    if prefixes.is_empty() {
        String::new()
    } else {
        format!(" with prefixes [{}]", prefixes.join(", "))
    }
}

impl Error {
    pub(crate) fn filename_format(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidFilenameFormat {
            file_name: file_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_locale(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidLocale {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// True for the per-file errors a scan collects instead of aborting on.
    pub(crate) fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::InvalidFilenameFormat { .. }
                | Error::InvalidLocale { .. }
                | Error::UnreadableFile { .. }
        )
    }
}
