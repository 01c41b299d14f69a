//! Options for one-shot discovery with [`crate::LocalizerRegistry::discover`].

/// Discovery behavior options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// File prefixes to accept (`active` accepts `active.en.toml`). Empty accepts all.
    pub prefixes: Vec<String>,
    /// Load the valid files even when some candidates were rejected.
    pub allow_partial: bool,
}

impl LoadOptions {
    /// Creates default options: every prefix, no partial loads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the accepted prefixes.
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one accepted prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Enables/disables loading despite rejected files.
    pub fn with_allow_partial(mut self, allow_partial: bool) -> Self {
        self.allow_partial = allow_partial;
        self
    }
}
