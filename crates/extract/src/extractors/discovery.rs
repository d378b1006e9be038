use std::collections::HashSet;

use crate::config::DiscoveryGate;
use crate::normalizer::clean_discovered_name;

/// Lowercase words allowed inside a multi-word name ("Order of the Gauntlet")
const CONNECTORS: &[&str] = &["of", "the", "de", "du", "la", "von", "van"];

/// Stop-list lookup built once per extractor pass
pub struct StopList {
    words: HashSet<String>,
}

impl StopList {
    pub fn new(words: &[String]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Apply the confidence gate to a raw discovered mention.
///
/// Leading stop words ("Then", "The") are dropped before the shape check, so
/// "Then Floon" is accepted as "Floon" while "Session Notes" is rejected.
pub fn accept_candidate(raw: &str, gate: &DiscoveryGate, stop: &StopList) -> Option<String> {
    let cleaned = clean_discovered_name(raw);

    let words: Vec<&str> = cleaned
        .split_whitespace()
        .skip_while(|w| stop.contains(w))
        .collect();
    let (first, last) = (words.first()?, words.last()?);

    if !is_capitalized(first) || !is_capitalized(last) {
        return None;
    }

    for word in &words {
        let connector = CONNECTORS.contains(word);
        if !connector && (!is_capitalized(word) || stop.contains(word)) {
            return None;
        }
    }

    let candidate = words.join(" ");
    if !gate.allows_length(&candidate) {
        return None;
    }
    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::dictionary::TermDictionary;

    fn stop() -> StopList {
        StopList::new(&TermDictionary::default().stop_words)
    }

    #[test]
    fn test_accepts_capitalized_names() {
        let gate = ExtractionConfig::default().npc_gate;
        assert_eq!(accept_candidate("Floon.", &gate, &stop()).as_deref(), Some("Floon"));
        assert_eq!(
            accept_candidate("Then Captain Zord", &gate, &stop()).as_deref(),
            Some("Captain Zord")
        );
        assert_eq!(
            accept_candidate("Order of the Gauntlet", &ExtractionConfig::default().location_gate, &stop())
                .as_deref(),
            Some("Order of the Gauntlet")
        );
    }

    #[test]
    fn test_rejects_structure_words_and_bad_shapes() {
        let gate = ExtractionConfig::default().npc_gate;
        assert_eq!(accept_candidate("Synopsis", &gate, &stop()), None);
        assert_eq!(accept_candidate("Session Notes", &gate, &stop()), None);
        assert_eq!(accept_candidate("The", &gate, &stop()), None);
        assert_eq!(accept_candidate("floon", &gate, &stop()), None);
        assert_eq!(accept_candidate("Al", &gate, &stop()), None);
        assert_eq!(accept_candidate("Zord of", &gate, &stop()), None);
    }
}
