use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::schema::EntityKind;

static TRAILING_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\s.,!?;:"'’)\]]+$"#).unwrap());
static POSSESSIVE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:'s|’s)$").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Case- and whitespace-insensitive form of a title: trimmed and lowercased
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Duplicate-grouping key: `"{kind}-{normalized title}"`
pub fn title_key(kind: EntityKind, title: &str) -> String {
    format!("{}-{}", kind, normalize_title(title))
}

/// Clean a discovered name: collapse inner whitespace, drop trailing punctuation
/// and a possessive suffix.
pub fn clean_discovered_name(name: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(name.trim(), " ");
    let stripped = TRAILING_PUNCT_RE.replace(&collapsed, "");
    let stripped = POSSESSIVE_RE.replace(&stripped, "");
    TRAILING_PUNCT_RE.replace(&stripped, "").to_string()
}

/// Titles already captured by one extractor pass, keyed by normalized title
#[derive(Debug, Default)]
pub struct SeenTitles {
    titles: HashSet<String>,
}

impl SeenTitles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(&normalize_title(title))
    }

    /// Returns `true` if the title had not been seen before
    pub fn insert(&mut self, title: &str) -> bool {
        self.titles.insert(normalize_title(title))
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
