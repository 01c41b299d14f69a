//! Process-wide slot for an optional ambient [`LocalizerService`].
//!
//! Passing a [`crate::LocalizerRegistry`] explicitly is the primary way to use
//! this crate. The global slot is a convenience for code that cannot thread a
//! registry through its call graph.
//!
//! [`swap`] returns a restore closure that re-installs the service that was
//! active at the moment of that particular swap. It is a snapshot, not an
//! undo stack: restoring an outer swap while an inner one is still active
//! discards the inner service, and overlapping swaps from several threads end
//! in whichever snapshot was restored last.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    message::Message,
    service::{LocalizerHandle, LocalizerService},
};

/// Shared, type-erased service as stored in the slot.
pub type SharedService = Arc<dyn LocalizerService>;

static SERVICE: RwLock<Option<SharedService>> = RwLock::new(None);

const NOT_INSTALLED: &str = "no localizer service installed; call lingo::global::swap before use";

fn store(service: Option<SharedService>) -> Option<SharedService> {
    // The slot only ever holds a whole `Option<Arc<_>>`, so a poisoned lock
    // still guards a consistent value.
    let mut guard = SERVICE.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *guard, service)
}

/// Installs `service` (or clears the slot with `None`) and returns a closure
/// restoring the previously installed service.
///
/// The closure may be called any number of times; each call re-installs the
/// same snapshot.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// let registry = lingo::catalog_registry("en".parse()?, "config/translations", &["active"])?;
/// let restore = lingo::global::swap(Some(Arc::new(registry)));
/// // ... lingo::global::resolve / translate ...
/// restore();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn swap(service: Option<SharedService>) -> impl Fn() + Send + Sync + 'static {
    let previous = store(service);
    debug!(restorable = previous.is_some(), "swapped global localizer service");
    move || {
        store(previous.clone());
    }
}

/// Returns the installed service, if any.
pub fn get() -> Option<SharedService> {
    SERVICE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn installed() -> SharedService {
    match get() {
        Some(service) => service,
        None => panic!("{NOT_INSTALLED}"),
    }
}

/// Forwards to the installed service's [`LocalizerService::resolve`].
///
/// # Panics
///
/// Panics if no service is installed.
pub fn resolve(locale: &LanguageIdentifier) -> Result<(LocalizerHandle, bool), Error> {
    installed().resolve(locale)
}

/// Forwards to the installed service's [`LocalizerService::translate`].
///
/// # Panics
///
/// Panics if no service is installed.
pub fn translate(localizer: &LocalizerHandle, message: Option<&Message>) -> Result<String, Error> {
    installed().translate(localizer, message)
}

/// Forwards to the installed service's [`LocalizerService::must_translate`].
///
/// # Panics
///
/// Panics if no service is installed or the translation fails.
pub fn must_translate(localizer: &LocalizerHandle, message: Option<&Message>) -> String {
    installed().must_translate(localizer, message)
}
