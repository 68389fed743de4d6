//! Template rendering.
//!
//! # Data Flow
//! ```text
//! stubs/*.conf (embedded at compile time)
//!     → Template { body, declared placeholders }
//!     → optional text pre-pass (loopback rewrite)
//!     → TokenSet::render (literal replacement)
//!     → Filesystem::put_as_user
//! ```
//!
//! # Design Decisions
//! - Plain string replacement, no templating engine
//! - A token set must cover exactly the placeholders a template declares;
//!   a missing or surplus value is an error instead of a silent no-op
//! - Declared placeholders are checked against the bodies in tests

pub mod stubs;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub use stubs::{FASTCGI_PARAMS, NGINX_CONF, SECURE_SITE_CONF, VALET_CONF};

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bVALET_[A-Z][A-Z_]*\b").expect("placeholder pattern is valid")
});

/// A symbolic token recognized verbatim in template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    User,
    HomePath,
    ServerPath,
    StaticPrefix,
    Site,
    Cert,
    Key,
}

impl Placeholder {
    pub const ALL: [Placeholder; 7] = [
        Placeholder::User,
        Placeholder::HomePath,
        Placeholder::ServerPath,
        Placeholder::StaticPrefix,
        Placeholder::Site,
        Placeholder::Cert,
        Placeholder::Key,
    ];

    /// The literal token as it appears in template text.
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::User => "VALET_USER",
            Placeholder::HomePath => "VALET_HOME_PATH",
            Placeholder::ServerPath => "VALET_SERVER_PATH",
            Placeholder::StaticPrefix => "VALET_STATIC_PREFIX",
            Placeholder::Site => "VALET_SITE",
            Placeholder::Cert => "VALET_CERT",
            Placeholder::Key => "VALET_KEY",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Errors raised while rendering a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The template uses a placeholder the token set has no value for.
    #[error("template {template} needs a value for {placeholder}")]
    MissingValue {
        template: &'static str,
        placeholder: Placeholder,
    },

    /// The token set carries a value the template never uses.
    #[error("template {template} does not use {placeholder}")]
    UnusedValue {
        template: &'static str,
        placeholder: Placeholder,
    },
}

/// An embedded configuration template.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    /// File name of the stub, used in errors and logs.
    pub name: &'static str,
    pub body: &'static str,
    /// Placeholders the body is expected to contain.
    pub placeholders: &'static [Placeholder],
}

impl Template {
    /// Render the embedded body.
    pub fn render(&self, tokens: &TokenSet) -> Result<String, TemplateError> {
        self.render_text(self.body, tokens)
    }

    /// Render `text` (normally a pre-processed copy of the body) against this
    /// template's declared placeholders.
    pub fn render_text(&self, text: &str, tokens: &TokenSet) -> Result<String, TemplateError> {
        for placeholder in self.placeholders {
            if !tokens.values.contains_key(placeholder) {
                return Err(TemplateError::MissingValue {
                    template: self.name,
                    placeholder: *placeholder,
                });
            }
        }
        if let Some(unused) = tokens
            .values
            .keys()
            .find(|p| !self.placeholders.contains(*p))
        {
            return Err(TemplateError::UnusedValue {
                template: self.name,
                placeholder: *unused,
            });
        }

        Ok(tokens.apply(text))
    }
}

/// Fixed mapping from placeholder to literal substitution value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    values: BTreeMap<Placeholder, String>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the value for a placeholder.
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.values.insert(placeholder, value.into());
        self
    }

    fn apply(&self, text: &str) -> String {
        // Longest tokens first so a token that prefixes another never eats it.
        let mut ordered: Vec<_> = self.values.iter().collect();
        ordered.sort_by_key(|(p, _)| std::cmp::Reverse(p.token().len()));

        ordered
            .into_iter()
            .fold(text.to_string(), |acc, (placeholder, value)| {
                acc.replace(placeholder.token(), value)
            })
    }
}

/// Every `VALET_*` token appearing in `text`.
pub fn placeholders_in(text: &str) -> BTreeSet<String> {
    PLACEHOLDER_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
