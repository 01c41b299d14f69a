//! Locale extraction and BCP 47 validation for translation filenames.
//!
//! Filenames follow `prefix.locale.ext`, e.g. `active.en.toml` or
//! `menu.zh-CN.json`. The locale segment is parsed with [`unic_langid`] and then
//! checked against the extra rules in [`validate_locale`].

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use unic_langid::{LanguageIdentifier, subtags::Language};

use crate::error::Error;

/// Extensions accepted for translation files, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = [".toml", ".json", ".yaml", ".yml"];

/// Longest canonical tag accepted (BCP 47 recommends 35 characters).
pub const MAX_TAG_LENGTH: usize = 35;

const RESERVED_TAG_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

lazy_static! {
    static ref FILENAME_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9-]+\.[A-Za-z0-9]+$").unwrap();
}

/// Returns the supported extension `file_name` ends with, if any.
pub fn supported_extension(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| lower.ends_with(ext))
}

/// Checks whether the filename carries one of [`SUPPORTED_EXTENSIONS`].
pub fn has_supported_extension(file_name: &str) -> bool {
    supported_extension(file_name).is_some()
}

/// Extracts the locale segment of `prefix.locale.ext` and parses it.
///
/// Only the parse is performed here; see [`validate_locale`] for the
/// remaining checks.
pub fn extract_locale(file_name: &str) -> Result<LanguageIdentifier, Error> {
    // ASCII lowercasing keeps byte offsets, so the suffix can be cut directly.
    let stem = match supported_extension(file_name) {
        Some(ext) => &file_name[..file_name.len() - ext.len()],
        None => file_name,
    };

    let parts: Vec<&str> = stem.split('.').collect();
    if parts.len() < 2 {
        return Err(Error::filename_format(
            file_name,
            "expected format 'prefix.locale.{ext}'",
        ));
    }

    let token = parts[parts.len() - 1];
    token
        .parse::<LanguageIdentifier>()
        .map_err(|e| Error::invalid_locale(token, e.to_string()))
}

/// Applies the checks a parsed tag must pass before it can key a registry.
pub fn validate_locale(tag: &LanguageIdentifier) -> Result<(), Error> {
    let tag_str = tag.to_string();

    if *tag == LanguageIdentifier::default() {
        return Err(Error::invalid_locale(tag_str, "undefined language tag"));
    }
    if base_language(tag).is_none() {
        return Err(Error::invalid_locale(tag_str, "invalid base language"));
    }
    if tag_str.len() > MAX_TAG_LENGTH {
        return Err(Error::invalid_locale(tag_str, "language tag too long"));
    }
    if tag_str.contains(RESERVED_TAG_CHARS) {
        return Err(Error::invalid_locale(
            tag_str,
            "language tag contains invalid characters",
        ));
    }

    Ok(())
}

/// The tag's base language, inferred from likely subtags when it is `und`.
///
/// `und-US` yields `en`; `None` only when nothing can be inferred.
pub fn base_language(tag: &LanguageIdentifier) -> Option<Language> {
    if !tag.language.is_empty() {
        return Some(tag.language);
    }
    let mut maximized = tag.clone();
    maximized.maximize();
    (!maximized.language.is_empty()).then_some(maximized.language)
}

/// Full filename check used by the scanner: format, path fragments, locale.
pub fn locale_from_file_name(file_name: &str) -> Result<LanguageIdentifier, Error> {
    if !FILENAME_REGEX.is_match(file_name) {
        return Err(Error::filename_format(
            file_name,
            format!(
                "does not match expected format 'prefix.locale.{{ext}}' where ext is one of: {} (only alphanumeric, hyphens, underscores allowed)",
                SUPPORTED_EXTENSIONS.join(", ")
            ),
        ));
    }

    let base = Path::new(file_name).file_name().and_then(|s| s.to_str());
    if base != Some(file_name) {
        return Err(Error::filename_format(
            file_name,
            "contains invalid path characters",
        ));
    }

    let locale = extract_locale(file_name)?;
    validate_locale(&locale)?;
    Ok(locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langid(s: &str) -> LanguageIdentifier {
        s.parse().unwrap()
    }

    #[test]
    fn test_supported_extension_is_case_insensitive() {
        assert_eq!(supported_extension("active.en.TOML"), Some(".toml"));
        assert_eq!(supported_extension("active.en.Yml"), Some(".yml"));
        assert_eq!(supported_extension("active.en.yaml"), Some(".yaml"));
        assert_eq!(supported_extension("active.en.txt"), None);
        assert!(!has_supported_extension("README.md"));
    }

    #[test]
    fn test_extract_locale_basic() {
        assert_eq!(extract_locale("active.en.toml").unwrap(), langid("en"));
        assert_eq!(extract_locale("menu.zh-CN.json").unwrap(), langid("zh-CN"));
        assert_eq!(extract_locale("a.b.pt-BR.yml").unwrap(), langid("pt-BR"));
    }

    #[test]
    fn test_extract_locale_uppercase_extension() {
        assert_eq!(extract_locale("active.fr.JSON").unwrap(), langid("fr"));
    }

    #[test]
    fn test_extract_locale_missing_segment() {
        let err = extract_locale("active.toml").unwrap_err();
        assert!(matches!(err, Error::InvalidFilenameFormat { .. }));
    }

    #[test]
    fn test_extract_locale_unparseable() {
        let err = extract_locale("active.not_a_locale!.toml").unwrap_err();
        assert!(matches!(err, Error::InvalidLocale { .. }));

        let err = extract_locale("invalid..toml").unwrap_err();
        assert!(matches!(err, Error::InvalidLocale { .. }));
    }

    #[test]
    fn test_validate_locale_rejects_undefined() {
        let err = validate_locale(&langid("und")).unwrap_err();
        match err {
            Error::InvalidLocale { tag, reason } => {
                assert_eq!(tag, "und");
                assert!(reason.contains("undefined"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_locale_infers_base_language() {
        for tag in ["und-US", "und-Latn", "und-FR"] {
            assert!(validate_locale(&langid(tag)).is_ok(), "{tag} should be valid");
        }
        assert_eq!(base_language(&langid("und-US")).unwrap().as_str(), "en");
        assert_eq!(base_language(&langid("und-FR")).unwrap().as_str(), "fr");
        assert_eq!(base_language(&langid("pt-BR")).unwrap().as_str(), "pt");
    }

    #[test]
    fn test_locale_from_file_name_accepts_undetermined_with_region() {
        assert_eq!(
            locale_from_file_name("active.und-US.toml").unwrap(),
            langid("und-US")
        );
    }

    #[test]
    fn test_validate_locale_rejects_long_tags() {
        let tag = langid("en-Latn-US-variant1-variant2-variant3-variant4");
        assert!(tag.to_string().len() > MAX_TAG_LENGTH);
        let err = validate_locale(&tag).unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn test_validate_locale_accepts_common_tags() {
        for tag in ["en", "fr", "zh-CN", "pt-BR", "sr-Latn", "es-419"] {
            assert!(validate_locale(&langid(tag)).is_ok(), "{tag} should be valid");
        }
    }

    #[test]
    fn test_locale_from_file_name() {
        assert_eq!(locale_from_file_name("active.en.toml").unwrap(), langid("en"));
        assert_eq!(
            locale_from_file_name("active_v2.en-US.yaml").unwrap(),
            langid("en-US")
        );
    }

    #[test]
    fn test_locale_from_file_name_rejects_bad_formats() {
        for name in [
            "invalid..toml",
            ".en.toml",
            "active.toml",
            "a.b.en.toml",
            "../active.en.toml",
            "active.en_US.toml",
            "act ive.en.toml",
        ] {
            let err = locale_from_file_name(name).unwrap_err();
            assert!(
                matches!(err, Error::InvalidFilenameFormat { .. }),
                "{name} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_locale_from_file_name_rejects_undefined_locale() {
        let err = locale_from_file_name("active.und.toml").unwrap_err();
        assert!(matches!(err, Error::InvalidLocale { .. }));
    }

    #[test]
    fn test_locale_is_canonicalized() {
        assert_eq!(locale_from_file_name("active.EN-us.toml").unwrap().to_string(), "en-US");
    }
}
