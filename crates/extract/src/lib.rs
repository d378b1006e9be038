pub mod config;
pub mod context;
pub mod dictionary;
pub mod extractors;
pub mod normalizer;
pub mod schema;
pub mod session;

pub use config::{DiscoveryGate, ExtractionConfig, ImportanceThresholds};
pub use dictionary::{ItemOverride, LocationOverride, NpcOverride, TermDictionary};
pub use extractors::{CandidateExtractor, PIPELINE, QuestPatterns};
pub use normalizer::{normalize_title, title_key};
pub use schema::{
    Entity, EntityDetails, EntityKind, IdentifiedEntity, Importance, ItemDetails, ItemType,
    LocationDetails, LocationType, NpcDetails, NpcStatus, PlayerDetails, QuestDetails,
    QuestStatus, QuestType, Rarity, SessionPrepDetails, SessionStatus, SessionSummaryDetails,
};

use ingest::SourceContent;
use std::time::Instant;
use tracing::{debug, info};

use context::{DocumentView, ExtractionContext};

/// Turns one converted session document into candidate entities.
///
/// Holds the dictionaries and tuning knobs; extraction itself is a pure function of
/// `(content, dictionary, config)`.
pub struct Extractor {
    dictionary: TermDictionary,
    config: ExtractionConfig,
    quest_patterns: QuestPatterns,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(TermDictionary::default(), ExtractionConfig::default())
    }
}

impl Extractor {
    pub fn new(dictionary: TermDictionary, config: ExtractionConfig) -> Self {
        let quest_patterns = QuestPatterns::compile_or_empty(&dictionary);
        Self {
            dictionary,
            config,
            quest_patterns,
        }
    }

    /// Extract the session record followed by NPC, location, item and quest
    /// candidates, in that order. Never fails; an empty document gives `[]`.
    pub fn extract(&self, content: &SourceContent) -> Vec<Entity> {
        let started = Instant::now();

        let session = session::extract_session(content, &self.config);
        let session_number = session.as_ref().and_then(Entity::session_number);

        let view = DocumentView::new(&content.plain_text);
        let ctx = ExtractionContext {
            view: &view,
            dictionary: &self.dictionary,
            config: &self.config,
            quest_patterns: &self.quest_patterns,
            session: session_number,
        };

        let mut entities: Vec<Entity> = session.into_iter().collect();
        for extractor in PIPELINE {
            let candidates = extractor.extract(&ctx);
            debug!(
                file = %content.filename,
                kind = %extractor.kind(),
                count = candidates.len(),
                "Extractor finished"
            );
            entities.extend(candidates);
        }

        info!(
            file = %content.filename,
            session = ?session_number,
            entities = entities.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Extracted entities"
        );
        entities
    }

    pub fn dictionary(&self) -> &TermDictionary {
        &self.dictionary
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }
}

/// Extract with the built-in dictionary and default configuration
pub fn extract(content: &SourceContent) -> Vec<Entity> {
    Extractor::default().extract(content)
}

/// Give every entity an id of the form `"{kind}-{index}"`, where `index` is the
/// entity's position in the list.
pub fn assign_ids(entities: Vec<Entity>) -> Vec<IdentifiedEntity> {
    entities
        .into_iter()
        .enumerate()
        .map(|(index, entity)| IdentifiedEntity::new(format!("{}-{}", entity.kind(), index), entity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_ids_by_position() {
        let npc = Entity::new("Durnan", EntityDetails::Npc(NpcDetails::default())).unwrap();
        let place = Entity::new("Waterdeep", EntityDetails::Location(LocationDetails::default())).unwrap();

        let ids: Vec<_> = assign_ids(vec![npc.clone(), place, npc])
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["npc-0", "location-1", "npc-2"]);
    }

    #[test]
    fn test_kind_order_is_fixed() {
        let content = SourceContent::from_plain(
            "session-1.md",
            "We found a Bag of Holding in Waterdeep. Durnan asked us to rescue Floon.",
            vec![],
        );
        let kinds: Vec<_> = extract(&content).iter().map(Entity::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::SessionSummary,
                EntityKind::Npc,
                EntityKind::Location,
                EntityKind::Item,
                EntityKind::Quest,
            ]
        );
    }
}
