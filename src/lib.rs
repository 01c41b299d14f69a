#![forbid(unsafe_code)]
//! Translation file discovery, BCP 47 locale validation and locale resolution.
//!
//! lingo finds translation files named `prefix.locale.ext` in a directory,
//! validates the embedded locale, loads each file through a translation
//! [`Backend`] and exposes a [`LocalizerRegistry`] that resolves a requested
//! locale to a loaded localizer, falling back to a default locale.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lingo::{LocalizerService, Message, catalog_registry};
//! use serde_json::json;
//!
//! // Loads config/translations/active.en.toml, active.fr.json, ...
//! let registry = catalog_registry("en".parse()?, "config/translations", &["active"])?;
//!
//! let (localizer, found) = registry.resolve(&"es".parse()?)?;
//! if !found {
//!     // No Spanish catalog: `localizer` is the English one.
//! }
//!
//! let message = Message::new("hello").with_data(json!({ "name": "World" }));
//! let text = registry.translate(&localizer, Some(&message))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Supported Files
//!
//! - **Extensions**: `.toml`, `.json`, `.yaml`, `.yml` (any case)
//! - **Names**: `<prefix>.<locale>.<ext>`, prefix `[A-Za-z0-9_-]+`, locale a
//!   BCP 47 tag such as `en` or `zh-CN`
//! - **Size**: at most 1 MiB
//!
//! The built-in [`CatalogBackend`] reads go-i18n style catalogs; other engines
//! plug in by implementing [`Backend`] and [`Localizer`].

pub mod catalog;
pub mod error;
pub mod global;
pub mod locale;
pub mod message;
pub mod options;
pub mod registry;
pub mod scanner;
pub mod service;

// Re-export most used types for easy consumption
pub use crate::{
    catalog::{Catalog, CatalogBackend, CatalogFormat, CatalogLocalizer},
    error::{BoxError, Error},
    locale::{SUPPORTED_EXTENSIONS, extract_locale, validate_locale},
    message::Message,
    options::LoadOptions,
    registry::{LocalizerRegistry, catalog_registry},
    scanner::{Scan, TranslationFile, scan},
    service::{Backend, Localizer, LocalizerHandle, LocalizerService},
};
pub use unic_langid::LanguageIdentifier;
