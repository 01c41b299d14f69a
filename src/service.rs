//! Capability traits at the seams between the registry, the translation
//! backend and the callers.

use std::{fmt::Debug, sync::Arc};

use unic_langid::LanguageIdentifier;

use crate::{
    error::{BoxError, Error},
    message::Message,
    scanner::TranslationFile,
};

/// A loaded, per-locale translation capability produced by a [`Backend`].
pub trait Localizer: Send + Sync + Debug {
    /// Locale this localizer renders messages for.
    fn locale(&self) -> &LanguageIdentifier;

    /// Renders `message`, reporting backend failures such as unknown ids.
    fn localize(&self, message: &Message) -> Result<String, BoxError>;
}

/// Shared handle to a [`Localizer`]; the registry only indexes these.
pub type LocalizerHandle = Arc<dyn Localizer>;

/// Loads translation files into localizer handles.
///
/// Any `FnMut(&TranslationFile) -> Result<LocalizerHandle, BoxError>` closure is a
/// backend, which keeps test doubles short.
pub trait Backend {
    fn load_message_file(&mut self, file: &TranslationFile) -> Result<LocalizerHandle, BoxError>;
}

impl<F> Backend for F
where
    F: FnMut(&TranslationFile) -> Result<LocalizerHandle, BoxError>,
{
    fn load_message_file(&mut self, file: &TranslationFile) -> Result<LocalizerHandle, BoxError> {
        self(file)
    }
}

/// Public surface of a localizer registry.
///
/// Implemented by [`crate::LocalizerRegistry`]; alternative implementations
/// (mocks, remote catalogs) can be installed globally through [`crate::global`].
pub trait LocalizerService: Send + Sync {
    /// Returns the localizer for `locale` and whether it was an exact match.
    /// A miss yields the default locale's localizer with `false`.
    fn resolve(&self, locale: &LanguageIdentifier) -> Result<(LocalizerHandle, bool), Error>;

    /// Translates `message` with `localizer`.
    ///
    /// `Ok` is the success case. A missing message is [`Error::NilMessage`],
    /// an empty id is [`Error::EmptyMessageId`], and backend failures come back
    /// as [`Error::Translate`].
    fn translate(
        &self,
        localizer: &LocalizerHandle,
        message: Option<&Message>,
    ) -> Result<String, Error> {
        let message = message.ok_or(Error::NilMessage)?;
        if message.id.is_empty() {
            return Err(Error::EmptyMessageId);
        }
        localizer.localize(message).map_err(|source| Error::Translate {
            id: message.id.clone(),
            source,
        })
    }

    /// Like [`LocalizerService::translate`] but panics on failure.
    ///
    /// Only for call sites where the message id is known to exist.
    fn must_translate(&self, localizer: &LocalizerHandle, message: Option<&Message>) -> String {
        match self.translate(localizer, message) {
            Ok(text) => text,
            Err(e) => panic!("translation failed: {e}"),
        }
    }
}
