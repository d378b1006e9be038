use crate::config::ExtractionConfig;
use crate::dictionary::TermDictionary;
use crate::extractors::QuestPatterns;

fn is_boundary(c: Option<char>) -> bool {
    c.is_none_or(|c| !c.is_alphanumeric())
}

/// Whole-word, case-sensitive occurrence of `term` in `haystack`
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }

    haystack.match_indices(term).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + term.len()..].chars().next();
        is_boundary(before) && is_boundary(after)
    })
}

/// Whole-word, case-insensitive occurrence of `keyword` in `haystack`
pub fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    contains_term(&haystack.to_lowercase(), &keyword.to_lowercase())
}

/// Value of the first `(keyword, value)` entry whose keyword appears in any sentence.
/// Table order decides, not sentence order.
pub fn first_keyword<'d, T>(sentences: &[&str], table: &'d [(String, T)]) -> Option<&'d T> {
    let lowered: Vec<String> = sentences.iter().map(|s| s.to_lowercase()).collect();
    table
        .iter()
        .find(|(keyword, _)| {
            let keyword = keyword.to_lowercase();
            lowered.iter().any(|s| contains_term(s, &keyword))
        })
        .map(|(_, value)| value)
}

/// First name from `names` that appears verbatim in any sentence
pub fn first_name<'d>(sentences: &[&str], names: &'d [String]) -> Option<&'d String> {
    names
        .iter()
        .find(|name| sentences.iter().any(|s| contains_term(s, name)))
}

/// Read-only view of one document's plain text, split into sentences once.
pub struct DocumentView<'a> {
    text: &'a str,
    sentences: Vec<&'a str>,
}

impl<'a> DocumentView<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            sentences: ingest::sentences(text),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn sentences(&self) -> &[&'a str] {
        &self.sentences
    }

    pub fn mentions(&self, name: &str) -> bool {
        contains_term(self.text, name)
    }

    pub fn sentences_mentioning(&self, name: &str) -> Vec<&'a str> {
        self.sentences
            .iter()
            .copied()
            .filter(|s| contains_term(s, name))
            .collect()
    }
}

/// Everything an extractor may read: the document, the dictionaries, the tuning
/// knobs, patterns precompiled from the dictionary and the session number (if one
/// was found).
pub struct ExtractionContext<'a> {
    pub view: &'a DocumentView<'a>,
    pub dictionary: &'a TermDictionary,
    pub config: &'a ExtractionConfig,
    pub quest_patterns: &'a QuestPatterns,
    pub session: Option<u32>,
}
