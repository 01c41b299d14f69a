//! Built-in message catalog backend.
//!
//! Decodes go-i18n style message files in TOML, JSON or YAML and renders
//! `{{.field}}` template fields. Plural handling is limited to choosing `one`
//! for a count of exactly 1 and `other` for everything else; full CLDR rules
//! belong to a dedicated formatting engine plugged in through
//! [`crate::service::Backend`].
//!
//! A catalog file maps message ids to either a plain string or a table:
//!
//! ```toml
//! hello = "Hello!"
//!
//! [unread]
//! description = "Unread message counter"
//! one = "{{.name}} has one unread message"
//! other = "{{.name}} has {{.PluralCount}} unread messages"
//!
//! [menu.file]
//! other = "File"
//! ```
//!
//! Tables without any reserved key nest, so the last entry has id `menu.file`.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::{Display, Formatter},
    fs,
    path::Path,
    str::FromStr,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard},
};

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::debug;
use unic_langid::LanguageIdentifier;

use crate::{
    error::BoxError,
    locale::supported_extension,
    message::Message,
    scanner::TranslationFile,
    service::{Backend, Localizer, LocalizerHandle},
};

lazy_static! {
    static ref TEMPLATE_FIELD_REGEX: Regex =
        Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap();
}

/// Rendered in place of a template field with no value.
pub const NO_VALUE: &str = "<no value>";

const PLURAL_COUNT_FIELD: &str = "PluralCount";

const RESERVED_KEYS: [&str; 4] = ["id", "description", "hash", "translation"];

/// Errors raised while decoding catalogs or rendering messages.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid message `{id}`: {reason}")]
    InvalidMessage { id: String, reason: String },

    #[error("message \"{id}\" not found in language \"{locale}\"")]
    MessageNotFound { id: String, locale: String },

    #[error("message \"{id}\" has no \"{category}\" form")]
    MissingPluralForm { id: String, category: PluralCategory },
}

/// Serialization format of a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogFormat {
    Toml,
    Json,
    Yaml,
}

impl CatalogFormat {
    /// Infers the format from a file name's supported extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        supported_extension(file_name).and_then(|ext| ext.trim_start_matches('.').parse().ok())
    }
}

impl Display for CatalogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogFormat::Toml => write!(f, "toml"),
            CatalogFormat::Json => write!(f, "json"),
            CatalogFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Accepts `toml`, `json`, `yaml` and `yml`, case-insensitively.
impl FromStr for CatalogFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(CatalogFormat::Toml),
            "json" => Ok(CatalogFormat::Json),
            "yaml" | "yml" => Ok(CatalogFormat::Yaml),
            other => Err(CatalogError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Plural categories a catalog message may define.
#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Clone, Copy, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }

    /// One/other selection; not a CLDR rule set.
    pub fn for_count(count: Option<&Number>) -> Self {
        match count.and_then(Number::as_f64) {
            Some(n) if n == 1.0 => PluralCategory::One,
            _ => PluralCategory::Other,
        }
    }
}

impl Display for PluralCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PluralCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown plural category: {}", s))
    }
}

/// A single catalog message with its plural forms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogMessage {
    pub description: Option<String>,
    pub forms: BTreeMap<PluralCategory, String>,
}

impl CatalogMessage {
    fn singular(text: String) -> Self {
        let mut forms = BTreeMap::new();
        forms.insert(PluralCategory::Other, text);
        Self {
            description: None,
            forms,
        }
    }

    /// Picks the form for `count`, falling back to `other`.
    pub fn form_for(&self, count: Option<&Number>) -> Option<&str> {
        self.forms
            .get(&PluralCategory::for_count(count))
            .or_else(|| self.forms.get(&PluralCategory::Other))
            .map(String::as_str)
    }
}

/// All messages decoded from one or more files of a single locale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    pub messages: BTreeMap<String, CatalogMessage>,
}

impl Catalog {
    /// Decodes catalog content. Blank content is an empty catalog.
    pub fn parse(content: &str, format: CatalogFormat) -> Result<Self, CatalogError> {
        if content.trim().is_empty() {
            return Ok(Catalog::default());
        }

        let root: Value = match format {
            CatalogFormat::Toml => toml::from_str(content)?,
            CatalogFormat::Json => serde_json::from_str(content)?,
            CatalogFormat::Yaml => serde_yaml::from_str(content)?,
        };

        let mut catalog = Catalog::default();
        match root {
            Value::Object(map) => catalog.collect(None, map)?,
            Value::Null => {}
            other => {
                return Err(CatalogError::InvalidMessage {
                    id: String::new(),
                    reason: format!("catalog root must be a table, found {}", kind(&other)),
                });
            }
        }
        Ok(catalog)
    }

    /// Reads and decodes a catalog file.
    pub fn read_from<P: AsRef<Path>>(
        path: P,
        format: CatalogFormat,
    ) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Adds all messages of `other`, replacing messages with the same id.
    pub fn merge(&mut self, other: Catalog) {
        self.messages.extend(other.messages);
    }

    pub fn get(&self, id: &str) -> Option<&CatalogMessage> {
        self.messages.get(id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn collect(
        &mut self,
        prefix: Option<&str>,
        map: Map<String, Value>,
    ) -> Result<(), CatalogError> {
        for (key, value) in map {
            let id = match prefix {
                Some(prefix) => format!("{prefix}.{key}"),
                None => key,
            };
            match value {
                Value::String(text) => {
                    self.messages.insert(id, CatalogMessage::singular(text));
                }
                Value::Object(table) if is_message_table(&table) => {
                    let message = message_from_table(&id, table)?;
                    self.messages.insert(id, message);
                }
                Value::Object(table) => self.collect(Some(&id), table)?,
                other => {
                    return Err(CatalogError::InvalidMessage {
                        reason: format!("expected a string or a table, found {}", kind(&other)),
                        id,
                    });
                }
            }
        }
        Ok(())
    }

    /// Renders message `message.id` with its template data and plural count.
    pub fn render(
        &self,
        locale: &LanguageIdentifier,
        message: &Message,
    ) -> Result<String, CatalogError> {
        let entry = self
            .get(&message.id)
            .ok_or_else(|| CatalogError::MessageNotFound {
                id: message.id.clone(),
                locale: locale.to_string(),
            })?;

        let template = entry.form_for(message.plural_count.as_ref()).ok_or_else(|| {
            CatalogError::MissingPluralForm {
                id: message.id.clone(),
                category: PluralCategory::for_count(message.plural_count.as_ref()),
            }
        })?;

        Ok(render_template(template, message))
    }
}

fn is_message_table(table: &Map<String, Value>) -> bool {
    table.keys().any(|key| {
        RESERVED_KEYS.contains(&key.as_str()) || key.parse::<PluralCategory>().is_ok()
    })
}

fn message_from_table(id: &str, table: Map<String, Value>) -> Result<CatalogMessage, CatalogError> {
    let mut message = CatalogMessage::default();
    for (key, value) in table {
        let text = match value {
            Value::String(text) => text,
            other => {
                return Err(CatalogError::InvalidMessage {
                    id: id.to_string(),
                    reason: format!("field `{key}` must be a string, found {}", kind(&other)),
                });
            }
        };
        match key.as_str() {
            "description" => message.description = Some(text),
            // The single-form `translation` key behaves like `other`.
            "translation" => {
                message.forms.entry(PluralCategory::Other).or_insert(text);
            }
            "id" | "hash" => {}
            _ => match key.parse::<PluralCategory>() {
                Ok(category) => {
                    message.forms.insert(category, text);
                }
                Err(_) => debug!(id, key = %key, "ignoring unknown message field"),
            },
        }
    }
    Ok(message)
}

fn render_template(template: &str, message: &Message) -> String {
    TEMPLATE_FIELD_REGEX
        .replace_all(template, |caps: &Captures| {
            let field = &caps[1];
            let value = message
                .data
                .as_ref()
                .and_then(|data| data.get(field))
                .cloned()
                .or_else(|| match field {
                    PLURAL_COUNT_FIELD => message.plural_count.clone().map(Value::Number),
                    _ => None,
                });
            display_value(value.as_ref())
        })
        .into_owned()
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NO_VALUE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

type SharedCatalog = Arc<RwLock<Catalog>>;

fn read_catalog(catalog: &SharedCatalog) -> RwLockReadGuard<'_, Catalog> {
    catalog.read().unwrap_or_else(PoisonError::into_inner)
}

/// Localizer over one locale's catalog.
///
/// When built by a [`CatalogBackend`] with a default locale, messages missing
/// from this locale are rendered from the default locale's catalog.
#[derive(Debug, Clone)]
pub struct CatalogLocalizer {
    locale: LanguageIdentifier,
    catalog: SharedCatalog,
    fallback: Option<SharedCatalog>,
}

impl CatalogLocalizer {
    pub fn new(locale: LanguageIdentifier, catalog: Catalog) -> Self {
        Self {
            locale,
            catalog: Arc::new(RwLock::new(catalog)),
            fallback: None,
        }
    }

    /// Renders messages missing from this locale from `fallback` instead.
    pub fn with_fallback(mut self, fallback: Catalog) -> Self {
        self.fallback = Some(Arc::new(RwLock::new(fallback)));
        self
    }
}

impl Localizer for CatalogLocalizer {
    fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    fn localize(&self, message: &Message) -> Result<String, BoxError> {
        let catalog = read_catalog(&self.catalog);
        if catalog.get(&message.id).is_none() {
            if let Some(fallback) = &self.fallback {
                let fallback = read_catalog(fallback);
                if fallback.get(&message.id).is_some() {
                    debug!(
                        id = %message.id,
                        locale = %self.locale,
                        "rendering from default catalog"
                    );
                    return Ok(fallback.render(&self.locale, message)?);
                }
            }
        }
        Ok(catalog.render(&self.locale, message)?)
    }
}

/// [`Backend`] decoding catalog files; files sharing a locale are merged.
///
/// Every handle for a locale shares that locale's merged catalog, so a file
/// loaded later is visible through handles returned earlier.
#[derive(Debug, Default)]
pub struct CatalogBackend {
    default_locale: Option<LanguageIdentifier>,
    catalogs: HashMap<LanguageIdentifier, SharedCatalog>,
}

impl CatalogBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose localizers fall back to `default_locale` per message.
    pub fn with_default(default_locale: LanguageIdentifier) -> Self {
        Self {
            default_locale: Some(default_locale),
            catalogs: HashMap::new(),
        }
    }

    fn shared(&mut self, locale: &LanguageIdentifier) -> SharedCatalog {
        Arc::clone(self.catalogs.entry(locale.clone()).or_default())
    }
}

impl Backend for CatalogBackend {
    fn load_message_file(&mut self, file: &TranslationFile) -> Result<LocalizerHandle, BoxError> {
        let loaded = Catalog::read_from(&file.path, file.format)?;
        debug!(
            path = %file.path.display(),
            locale = %file.locale,
            messages = loaded.len(),
            "loaded message file"
        );

        let catalog = self.shared(&file.locale);
        catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(loaded);

        // The default catalog may not be loaded yet; its slot fills in later.
        let fallback = match self.default_locale.clone() {
            Some(default) if default != file.locale => Some(self.shared(&default)),
            _ => None,
        };

        Ok(Arc::new(CatalogLocalizer {
            locale: file.locale.clone(),
            catalog,
            fallback,
        }))
    }
}
