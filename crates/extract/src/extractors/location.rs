use regex::Regex;
use std::sync::LazyLock;

use super::CandidateExtractor;
use super::discovery::{StopList, accept_candidate};
use crate::context::{ExtractionContext, contains_term, first_keyword};
use crate::normalizer::{SeenTitles, normalize_title};
use crate::schema::{Entity, EntityDetails, EntityKind, LocationDetails};

static PLACE_PREPOSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?i:in|at|into|inside|near|toward|towards|entered|visited|reached)[ \t]+(?:(?i:the)[ \t]+)?([A-Z][\w'’-]*(?:[ \t]+(?:of[ \t]+(?:the[ \t]+)?)?[A-Z][\w'’-]*){0,3})",
    )
    .unwrap()
});
static PLACE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b((?:[A-Z][\w'’-]*[ \t]+){1,3}(?:Tavern|Inn|Keep|Tower|Temple|Castle|Manor|Ward|Street|Road|Forest|Woods|Mountains|Hills|Cave|Caves|Mine|Mines|Market|Harbor|Gate|Hall|Bridge|Sewers|Crypt|Shrine))\b",
    )
    .unwrap()
});

fn place_mentions(text: &str) -> Vec<&str> {
    let suffixed = PLACE_SUFFIX_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());
    let prepositional = PLACE_PREPOSITION_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());

    suffixed.chain(prepositional).collect()
}

fn build_location(ctx: &ExtractionContext<'_>, name: &str) -> Option<Entity> {
    let dict = ctx.dictionary;
    let sentences = ctx.view.sentences_mentioning(name);
    let overrides = dict.location_overrides.get(name).cloned().unwrap_or_default();
    let own_key = normalize_title(name);

    let region = overrides.region.or_else(|| {
        dict.regions
            .iter()
            .filter(|r| normalize_title(r) != own_key)
            .find(|r| sentences.iter().any(|s| contains_term(s, r)))
            .cloned()
    });

    let details = LocationDetails {
        location_type: overrides
            .location_type
            .or_else(|| first_keyword(&sentences, &dict.location_types).copied()),
        region,
        parent: overrides.parent,
        ..Default::default()
    };

    Entity::new(name, EntityDetails::Location(details)).map(|e| e.with_session(ctx.session))
}

/// Rejects people, and bare type words such as "Tavern" with no proper name
fn is_rejected(ctx: &ExtractionContext<'_>, name: &str) -> bool {
    let key = normalize_title(name);
    let dict = ctx.dictionary;
    dict.npc_names
        .iter()
        .chain(&dict.factions)
        .any(|known| normalize_title(known) == key)
        || dict.location_types.iter().any(|(keyword, _)| *keyword == key)
}

pub struct LocationExtractor;

impl CandidateExtractor for LocationExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::Location
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<Entity> {
        let mut found = SeenTitles::new();
        let mut entities = Vec::new();

        for name in &ctx.dictionary.location_names {
            if found.contains(name) || !ctx.view.mentions(name) {
                continue;
            }
            if let Some(entity) = build_location(ctx, name) {
                found.insert(name);
                entities.push(entity);
            }
        }

        let stop = StopList::new(&ctx.dictionary.stop_words);
        for mention in place_mentions(ctx.view.text()) {
            let Some(name) = accept_candidate(mention, &ctx.config.location_gate, &stop) else {
                continue;
            };
            if found.contains(&name) || is_rejected(ctx, &name) {
                continue;
            }
            if let Some(entity) = build_location(ctx, &name) {
                found.insert(&name);
                entities.push(entity);
            }
        }

        entities
    }
}
