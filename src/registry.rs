//! The locale registry: loaded localizers keyed by locale, with fallback to a
//! default locale.

use std::{collections::HashMap, path::Path};

use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

use crate::{
    catalog::CatalogBackend,
    error::Error,
    options::LoadOptions,
    scanner::{self, TranslationFile},
    service::{Backend, LocalizerHandle, LocalizerService},
};

/// Localizers for every loaded locale plus the default used on a miss.
///
/// Immutable once built, so it can be shared across threads without locking.
#[derive(Debug)]
pub struct LocalizerRegistry {
    localizers: HashMap<LanguageIdentifier, LocalizerHandle>,
    default_locale: LanguageIdentifier,
}

impl LocalizerRegistry {
    /// Loads every file through `backend` and checks the default locale is present.
    ///
    /// The first load failure aborts; no partial registry is returned.
    pub fn build<B: Backend>(
        files: &[TranslationFile],
        default_locale: LanguageIdentifier,
        mut backend: B,
    ) -> Result<Self, Error> {
        if files.is_empty() {
            return Err(Error::NoCandidates(Default::default()));
        }

        let mut localizers = HashMap::with_capacity(files.len());
        for file in files {
            let handle = backend
                .load_message_file(file)
                .map_err(|source| Error::LoadFailure {
                    path: file.path.clone(),
                    source,
                })?;
            debug!(path = %file.path.display(), locale = %file.locale, "registered localizer");
            // A later file for the same locale replaces the earlier handle.
            localizers.insert(file.locale.clone(), handle);
        }

        if !localizers.contains_key(&default_locale) {
            return Err(Error::DefaultLocaleMissing(default_locale.to_string()));
        }

        Ok(Self {
            localizers,
            default_locale,
        })
    }

    /// Scans `dir` and builds a registry from the result.
    ///
    /// Rejected files fail discovery with the aggregated scan error unless
    /// [`LoadOptions::allow_partial`] is set, in which case they are only logged.
    pub fn discover<P, B>(
        dir: P,
        default_locale: LanguageIdentifier,
        options: &LoadOptions,
        backend: B,
    ) -> Result<Self, Error>
    where
        P: AsRef<Path>,
        B: Backend,
    {
        let dir = dir.as_ref();
        let (files, error) = scanner::scan(dir, options.prefixes.as_slice())?.into_parts();
        if let Some(error) = error {
            if !options.allow_partial {
                return Err(error);
            }
            warn!(path = %dir.display(), %error, "loading translations despite invalid files");
        }

        if files.is_empty() {
            return Err(Error::NoCandidates(dir.to_path_buf()));
        }
        Self::build(&files, default_locale, backend)
    }

    pub fn default_locale(&self) -> &LanguageIdentifier {
        &self.default_locale
    }

    /// Loaded locales, sorted by their string form.
    pub fn locales(&self) -> Vec<&LanguageIdentifier> {
        let mut locales: Vec<_> = self.localizers.keys().collect();
        locales.sort_by_key(|locale| locale.to_string());
        locales
    }

    pub fn contains(&self, locale: &LanguageIdentifier) -> bool {
        self.localizers.contains_key(locale)
    }

    pub fn len(&self) -> usize {
        self.localizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.localizers.is_empty()
    }
}

impl LocalizerService for LocalizerRegistry {
    fn resolve(&self, locale: &LanguageIdentifier) -> Result<(LocalizerHandle, bool), Error> {
        if let Some(localizer) = self.localizers.get(locale) {
            return Ok((localizer.clone(), true));
        }

        let default = self
            .localizers
            .get(&self.default_locale)
            .ok_or_else(|| Error::DefaultLocalizerMissing(self.default_locale.to_string()))?;
        debug!(
            requested = %locale,
            fallback = %self.default_locale,
            "locale not loaded, using default"
        );
        Ok((default.clone(), false))
    }
}

/// Discovers catalog files in `dir` and builds a registry with the built-in
/// [`CatalogBackend`].
///
/// Any rejected file fails the call.
///
/// # Example
///
/// ```rust,no_run
/// use lingo::{LocalizerService, Message, catalog_registry};
///
/// let registry = catalog_registry("en".parse()?, "config/translations", &["active"])?;
/// let (localizer, _found) = registry.resolve(&"fr".parse()?)?;
/// let text = registry.translate(&localizer, Some(&Message::new("hello")))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn catalog_registry<P, S>(
    default_locale: LanguageIdentifier,
    dir: P,
    prefixes: &[S],
) -> Result<LocalizerRegistry, Error>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let options =
        LoadOptions::new().with_prefixes(prefixes.iter().map(|p| p.as_ref().to_string()));
    let backend = CatalogBackend::with_default(default_locale.clone());
    LocalizerRegistry::discover(dir, default_locale, &options, backend)
}
