//! Router configuration.

use serde::{Deserialize, Serialize};

use crate::pattern::MatchOptions;
use crate::router::error::Error;

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Prefix joined in front of every route pattern.
    pub prefix: String,
    /// Hand out the legacy-convention dispatcher from `Router::middleware`.
    pub legacy: bool,
    /// Options forwarded to the pattern compiler.
    #[serde(flatten)]
    pub matching: MatchOptions,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            prefix: "/".to_string(),
            legacy: false,
            matching: MatchOptions::default(),
        }
    }
}

impl RouterConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Shallow-merge `options` over this configuration; keys set in `options` win.
    pub fn merge(&mut self, options: &RouterOptions) {
        if let Some(prefix) = &options.prefix {
            self.prefix = prefix.clone();
        }
        if let Some(legacy) = options.legacy {
            self.legacy = legacy;
        }
        if let Some(sensitive) = options.sensitive {
            self.matching.sensitive = sensitive;
        }
        if let Some(strict) = options.strict {
            self.matching.strict = strict;
        }
        if let Some(end) = options.end {
            self.matching.end = end;
        }
    }

    /// Whether routes compiled under `other` would differ from routes compiled under `self`.
    pub(crate) fn binding_differs(&self, other: &RouterConfig) -> bool {
        self.prefix != other.prefix || self.matching != other.matching
    }
}

/// A partial configuration merged over a router's `RouterConfig`.
///
/// `bool` converts into options that only set `legacy`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    pub prefix: Option<String>,
    pub legacy: Option<bool>,
    pub sensitive: Option<bool>,
    pub strict: Option<bool>,
    pub end: Option<bool>,
}

impl RouterOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the legacy flag.
    pub fn with_legacy(mut self, legacy: bool) -> Self {
        self.legacy = Some(legacy);
        self
    }

    /// Set case sensitivity.
    pub fn with_sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = Some(sensitive);
        self
    }

    /// Set strict trailing-slash matching.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Set end anchoring.
    pub fn with_end(mut self, end: bool) -> Self {
        self.end = Some(end);
        self
    }
}

impl From<bool> for RouterOptions {
    fn from(legacy: bool) -> Self {
        Self::new().with_legacy(legacy)
    }
}

impl From<RouterConfig> for RouterOptions {
    fn from(config: RouterConfig) -> Self {
        Self {
            prefix: Some(config.prefix),
            legacy: Some(config.legacy),
            sensitive: Some(config.matching.sensitive),
            strict: Some(config.matching.strict),
            end: Some(config.matching.end),
        }
    }
}
