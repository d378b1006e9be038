use regex::Regex;
use std::sync::LazyLock;

use super::CandidateExtractor;
use super::discovery::{StopList, accept_candidate};
use crate::context::{ExtractionContext, first_keyword, first_name};
use crate::normalizer::{SeenTitles, normalize_title};
use crate::schema::{Entity, EntityDetails, EntityKind, Importance, NpcDetails};

const NAME: &str = r"[A-Z][\w'’-]*(?:[ \t]+[A-Z][\w'’-]*){0,2}";

static HONORIFIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:Lord|Lady|Sir|Dame|Captain|King|Queen|Prince|Princess|Master|Mistress|Brother|Sister|Father|Mother|Commander|Sergeant|Magister)[ \t]+[A-Z][\w'’-]*(?:[ \t]+[A-Z][\w'’-]*)?",
    )
    .unwrap()
});
static NAMED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:named|called|known as)[ \t]+({NAME})")).unwrap()
});
static SPEECH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b({NAME})[ \t]+(?:said|says|asked|asks|replied|replies|told|tells|shouted|whispered|explained|warned|muttered|laughed|smiled|nodded|growled)\b"
    ))
    .unwrap()
});

/// Person-like mentions found through structural cues, in cue order
fn person_mentions(text: &str) -> Vec<&str> {
    let honorifics = HONORIFIC_RE.find_iter(text).map(|m| m.as_str());
    let named = NAMED_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());
    let speakers = SPEECH_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());

    honorifics.chain(named).chain(speakers).collect()
}

fn importance(mentions: usize, ctx: &ExtractionContext<'_>) -> Importance {
    let thresholds = ctx.config.importance;
    if mentions >= thresholds.major {
        Importance::Major
    } else if mentions >= thresholds.supporting {
        Importance::Supporting
    } else {
        Importance::Minor
    }
}

fn build_npc(ctx: &ExtractionContext<'_>, name: &str) -> Option<Entity> {
    let dict = ctx.dictionary;
    let sentences = ctx.view.sentences_mentioning(name);
    let overrides = dict.npc_overrides.get(name).cloned().unwrap_or_default();

    let details = NpcDetails {
        role: overrides
            .role
            .or_else(|| first_keyword(&sentences, &dict.roles).cloned()),
        faction: overrides
            .faction
            .or_else(|| first_name(&sentences, &dict.factions).cloned()),
        race: overrides
            .race
            .or_else(|| first_keyword(&sentences, &dict.races).cloned()),
        class: overrides
            .class
            .or_else(|| first_keyword(&sentences, &dict.classes).cloned()),
        importance: Some(
            overrides
                .importance
                .unwrap_or_else(|| importance(sentences.len(), ctx)),
        ),
        ..Default::default()
    };

    Entity::new(name, EntityDetails::Npc(details)).map(|e| e.with_session(ctx.session))
}

/// Names that belong to other vocabularies and must not come back as people
fn is_other_known_term(ctx: &ExtractionContext<'_>, name: &str) -> bool {
    let key = normalize_title(name);
    let dict = ctx.dictionary;
    dict.location_names
        .iter()
        .chain(&dict.item_names)
        .chain(&dict.factions)
        .chain(&dict.regions)
        .any(|known| normalize_title(known) == key)
}

pub struct NpcExtractor;

impl CandidateExtractor for NpcExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::Npc
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<Entity> {
        let mut found = SeenTitles::new();
        let mut entities = Vec::new();

        for name in &ctx.dictionary.npc_names {
            if found.contains(name) || !ctx.view.mentions(name) {
                continue;
            }
            if let Some(entity) = build_npc(ctx, name) {
                found.insert(name);
                entities.push(entity);
            }
        }

        let stop = StopList::new(&ctx.dictionary.stop_words);
        for mention in person_mentions(ctx.view.text()) {
            let Some(name) = accept_candidate(mention, &ctx.config.npc_gate, &stop) else {
                continue;
            };
            if found.contains(&name) || is_other_known_term(ctx, &name) {
                continue;
            }
            if let Some(entity) = build_npc(ctx, &name) {
                found.insert(&name);
                entities.push(entity);
            }
        }

        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::context::DocumentView;
    use crate::extractors::QuestPatterns;
    use crate::dictionary::TermDictionary;

    fn run(text: &str, session: Option<u32>) -> Vec<Entity> {
        let view = DocumentView::new(text);
        let dictionary = TermDictionary::default();
        let config = ExtractionConfig::default();
        let ctx = ExtractionContext {
            view: &view,
            dictionary: &dictionary,
            config: &config,
            quest_patterns: &QuestPatterns::default(),
            session,
        };
        NpcExtractor.extract(&ctx)
    }

    fn npc(entity: &Entity) -> &NpcDetails {
        match &entity.details {
            EntityDetails::Npc(d) => d,
            other => panic!("expected npc, got {:?}", other),
        }
    }

    #[test]
    fn test_known_name_with_role_from_sentence() {
        let entities = run("Durnan the barkeep poured ale for the party.", Some(2));
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].title, "Durnan");
        assert_eq!(npc(&entities[0]).role.as_deref(), Some("barkeep"));
        assert_eq!(entities[0].source_sessions, Some(vec![2]));
    }

    #[test]
    fn test_override_beats_inference() {
        let entities = run("Mirt, a retired guard, met us. Mirt is a dwarf.", None);
        let mirt = npc(&entities[0]);
        assert_eq!(mirt.role.as_deref(), Some("moneylender"));
        assert_eq!(mirt.faction.as_deref(), Some("Harpers"));
        assert_eq!(mirt.race.as_deref(), Some("human"));
        assert_eq!(mirt.importance, Some(Importance::Supporting));
    }

    #[test]
    fn test_discovery_through_cues() {
        let text = "A halfling named Pip Tealeaf waved. Captain Zord laughed at us. \
                    Then Floon said hello. Synopsis said nothing.";
        let titles: Vec<_> = run(text, None).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Captain Zord", "Pip Tealeaf", "Floon"]);
    }

    #[test]
    fn test_discovered_attributes_inferred() {
        let entities = run("A halfling named Pip Tealeaf waved. Pip Tealeaf is a Zhentarim spy.", None);
        let pip = npc(&entities[0]);
        assert_eq!(pip.role.as_deref(), Some("spy"));
        assert_eq!(pip.faction.as_deref(), Some("Zhentarim"));
        assert_eq!(pip.race.as_deref(), Some("halfling"));
    }

    #[test]
    fn test_known_name_not_rediscovered() {
        let entities = run("Durnan said nothing. Durnan nodded.", None);
        assert_eq!(entities.len(), 1);
        assert_eq!(npc(&entities[0]).importance, Some(Importance::Supporting));
    }

    #[test]
    fn test_no_candidates() {
        assert!(run("The party rested for the night.", None).is_empty());
    }
}
