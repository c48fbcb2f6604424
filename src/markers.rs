//! Marker list: the append-only token surface downstream styling keys off.

use std::fmt;

/// Emitted at the start of every aggregation pass, whatever the flags say.
pub const BASE_MARKER: &str = "js";

/// Whitespace-separated tokens, the way a class attribute holds them.
///
/// The list is only ever appended to. Aggregating twice appends the same
/// tokens twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerList {
    raw: String,
}

impl MarkerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing attribute value.
    pub fn from_existing(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Append raw text verbatim; callers supply their own separators.
    pub fn append(&mut self, text: &str) {
        self.raw.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.raw.split_whitespace()
    }

    pub fn len(&self) -> usize {
        self.tokens().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times `token` occurs.
    pub fn occurrences(&self, token: &str) -> usize {
        self.tokens().filter(|candidate| *candidate == token).count()
    }
}

impl fmt::Display for MarkerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Text one aggregation pass appends: the base marker, then every supported
/// flag name, each preceded by a space and all lower-cased.
pub fn marker_text<'a>(supported: impl IntoIterator<Item = &'a str>) -> String {
    let mut classes = format!(" {BASE_MARKER}");
    for name in supported {
        classes.push(' ');
        classes.push_str(name);
    }
    classes.to_lowercase()
}
