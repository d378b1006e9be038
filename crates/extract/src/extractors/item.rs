use super::CandidateExtractor;
use crate::context::{ExtractionContext, contains_keyword, first_keyword};
use crate::normalizer::SeenTitles;
use crate::schema::{Entity, EntityDetails, EntityKind, ItemDetails, ItemType};

const ATTUNEMENT_WORDS: &[&str] = &["attunement", "attune", "attuned"];

fn build_item(ctx: &ExtractionContext<'_>, name: &str) -> Option<Entity> {
    let dict = ctx.dictionary;
    let sentences = ctx.view.sentences_mentioning(name);
    let overrides = dict.item_overrides.get(name).cloned().unwrap_or_default();

    // Type comes from the item's own name, not from the surrounding text
    let item_type = overrides.item_type.unwrap_or_else(|| {
        first_keyword(&[name], &dict.item_types)
            .copied()
            .unwrap_or(ItemType::Wondrous)
    });

    let attuned = sentences
        .iter()
        .any(|s| ATTUNEMENT_WORDS.iter().any(|w| contains_keyword(s, w)));

    let details = ItemDetails {
        item_type: Some(item_type),
        rarity: overrides
            .rarity
            .or_else(|| first_keyword(&sentences, &dict.rarities).copied()),
        attunement: overrides.attunement.or(attuned.then_some(true)),
        ..Default::default()
    };

    Entity::new(name, EntityDetails::Item(details)).map(|e| e.with_session(ctx.session))
}

pub struct ItemExtractor;

impl CandidateExtractor for ItemExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::Item
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<Entity> {
        let mut found = SeenTitles::new();
        let mut entities = Vec::new();

        for name in &ctx.dictionary.item_names {
            if found.contains(name) || !ctx.view.mentions(name) {
                continue;
            }
            if let Some(entity) = build_item(ctx, name) {
                found.insert(name);
                entities.push(entity);
            }
        }

        entities
    }
}
