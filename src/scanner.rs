//! Discovery of translation files in a single directory.
//!
//! [`scan`] lists the direct entries of a directory, keeps files with a
//! supported extension (and, optionally, one of the requested prefixes), and
//! validates size and filename. Per-file problems are collected in the
//! returned [`Scan`] instead of aborting the whole pass, so one call reports
//! everything that is wrong with a directory.

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

use crate::{
    catalog::CatalogFormat,
    error::Error,
    locale::{has_supported_extension, locale_from_file_name},
};

/// Largest translation file accepted, in bytes (1 MiB).
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// A translation file accepted by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFile {
    /// Full path of the file (directory joined with the file name).
    pub path: PathBuf,
    /// Locale parsed from the file name.
    pub locale: LanguageIdentifier,
    /// Catalog format implied by the extension.
    pub format: CatalogFormat,
}

/// A candidate file that was rejected, with the reason.
#[derive(Debug)]
pub struct InvalidFile {
    pub file_name: String,
    pub reason: Error,
}

/// Outcome of a directory scan: accepted files plus rejected candidates.
#[derive(Debug, Default)]
pub struct Scan {
    pub files: Vec<TranslationFile>,
    pub invalid: Vec<InvalidFile>,
    prefixes: Vec<String>,
}

impl Scan {
    /// Returns true when no candidate was rejected.
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Names of the rejected files, in scan order.
    pub fn invalid_file_names(&self) -> Vec<String> {
        self.invalid.iter().map(|f| f.file_name.clone()).collect()
    }

    /// The aggregated error naming every rejected file, if there is any.
    pub fn error(&self) -> Option<Error> {
        if self.invalid.is_empty() {
            return None;
        }
        Some(Error::InvalidFiles {
            files: self.invalid_file_names(),
            prefixes: self.prefixes.clone(),
        })
    }

    /// Splits into the accepted files and the aggregated error. Both are
    /// meaningful together: a partial list comes with an error.
    pub fn into_parts(self) -> (Vec<TranslationFile>, Option<Error>) {
        let error = self.error();
        (self.files, error)
    }

    /// Accepted files, or the aggregated error if anything was rejected.
    pub fn into_result(self) -> Result<Vec<TranslationFile>, Error> {
        match self.into_parts() {
            (_, Some(error)) => Err(error),
            (files, None) => Ok(files),
        }
    }
}

/// Scans `dir` for translation files.
///
/// With a non-empty `prefixes`, only files named `<prefix>.<...>` for one of the
/// prefixes are considered. Fails only when the directory itself is unusable.
///
/// # Example
///
/// ```rust,no_run
/// let scan = lingo::scanner::scan("config/translations", &["active"])?;
/// let (files, error) = scan.into_parts();
/// if let Some(error) = error {
///     eprintln!("{error}");
/// }
/// println!("{} usable files", files.len());
/// # Ok::<(), lingo::Error>(())
/// ```
pub fn scan<P, S>(dir: P, prefixes: &[S]) -> Result<Scan, Error>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let dir = dir.as_ref();
    let prefixes: Vec<String> = prefixes.iter().map(|p| p.as_ref().to_string()).collect();

    let metadata = match fs::metadata(dir) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::PathNotFound(dir.to_path_buf()));
        }
        Err(source) => {
            return Err(Error::ReadFailure {
                path: dir.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(Error::PathNotDirectory(dir.to_path_buf()));
    }

    let read_failure = |source| Error::ReadFailure {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(read_failure)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_failure)?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut scan = Scan {
        prefixes,
        ..Scan::default()
    };

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !has_supported_extension(&file_name) {
            debug!(file = %file_name, "skipping file without a translation extension");
            continue;
        }
        if !matches_prefix(&file_name, &scan.prefixes) {
            debug!(file = %file_name, "skipping file outside the requested prefixes");
            continue;
        }

        match check_candidate(&path, &file_name) {
            Ok(file) => {
                debug!(file = %file_name, locale = %file.locale, "found translation file");
                scan.files.push(file);
            }
            Err(reason) if reason.is_per_file() => {
                warn!(file = %file_name, error = %reason, "invalid translation file");
                scan.invalid.push(InvalidFile { file_name, reason });
            }
            Err(other) => return Err(other),
        }
    }

    Ok(scan)
}

fn matches_prefix(file_name: &str, prefixes: &[String]) -> bool {
    prefixes.is_empty()
        || prefixes
            .iter()
            .any(|prefix| file_name.starts_with(&format!("{prefix}.")))
}

fn check_candidate(path: &Path, file_name: &str) -> Result<TranslationFile, Error> {
    check_readable(path, file_name)?;
    let locale = locale_from_file_name(file_name)?;
    let format = CatalogFormat::from_file_name(file_name).ok_or_else(|| {
        Error::filename_format(file_name, "unsupported translation file extension")
    })?;

    Ok(TranslationFile {
        path: path.to_path_buf(),
        locale,
        format,
    })
}

fn check_readable(path: &Path, file_name: &str) -> Result<(), Error> {
    let unreadable = |reason: String| Error::UnreadableFile {
        file_name: file_name.to_string(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unreadable("not a regular file".to_string()));
    }
    if metadata.len() > MAX_FILE_SIZE {
        return Err(unreadable(format!(
            "file is {} bytes, larger than the {} byte limit",
            metadata.len(),
            MAX_FILE_SIZE
        )));
    }
    File::open(path).map_err(|e| unreadable(e.to_string()))?;

    Ok(())
}
