use serde::{Deserialize, Deserializer, Serialize};

/// Confidence gate applied to discovered (non-dictionary) names.
///
/// A partial gate in a config file keeps the defaults of the gate it replaces, so
/// `{"location_gate": {"max_len": 60}}` still allows five words.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryGate {
    pub min_len: usize,
    pub max_len: usize,
    pub max_words: usize,
}

impl Default for DiscoveryGate {
    fn default() -> Self {
        Self::npc()
    }
}

impl DiscoveryGate {
    pub fn npc() -> Self {
        Self {
            min_len: 3,
            max_len: 25,
            max_words: 4,
        }
    }

    pub fn location() -> Self {
        Self {
            min_len: 3,
            max_len: 40,
            max_words: 5,
        }
    }

    fn overlay(self, partial: PartialGate) -> Self {
        Self {
            min_len: partial.min_len.unwrap_or(self.min_len),
            max_len: partial.max_len.unwrap_or(self.max_len),
            max_words: partial.max_words.unwrap_or(self.max_words),
        }
    }

    pub fn allows_length(&self, candidate: &str) -> bool {
        let len = candidate.chars().count();
        let words = candidate.split_whitespace().count();
        len >= self.min_len && len <= self.max_len && words <= self.max_words
    }
}

#[derive(Deserialize)]
struct PartialGate {
    min_len: Option<usize>,
    max_len: Option<usize>,
    max_words: Option<usize>,
}

fn npc_gate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DiscoveryGate, D::Error> {
    PartialGate::deserialize(deserializer).map(|p| DiscoveryGate::npc().overlay(p))
}

fn location_gate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DiscoveryGate, D::Error> {
    PartialGate::deserialize(deserializer).map(|p| DiscoveryGate::location().overlay(p))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportanceThresholds {
    /// Sentence mentions needed for `supporting`
    pub supporting: usize,
    /// Sentence mentions needed for `major`
    pub major: usize,
}

impl Default for ImportanceThresholds {
    fn default() -> Self {
        Self {
            supporting: 2,
            major: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    #[serde(deserialize_with = "npc_gate")]
    pub npc_gate: DiscoveryGate,
    #[serde(deserialize_with = "location_gate")]
    pub location_gate: DiscoveryGate,
    pub synopsis_max_chars: usize,
    pub importance: ImportanceThresholds,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            npc_gate: DiscoveryGate::npc(),
            location_gate: DiscoveryGate::location(),
            synopsis_max_chars: 500,
            importance: ImportanceThresholds::default(),
        }
    }
}
