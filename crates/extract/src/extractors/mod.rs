pub mod discovery;
pub mod item;
pub mod location;
pub mod npc;
pub mod quest;

pub use item::ItemExtractor;
pub use location::LocationExtractor;
pub use npc::NpcExtractor;
pub use quest::{QuestExtractor, QuestPatterns};

use crate::context::ExtractionContext;
use crate::schema::{Entity, EntityKind};

/// One kind-specific pass over a document. Implementations keep their own
/// dedupe set and never fail: finding nothing is an empty list.
pub trait CandidateExtractor: Sync {
    fn kind(&self) -> EntityKind;

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<Entity>;
}

/// Extractors in output order; id assignment depends on this order.
pub const PIPELINE: [&dyn CandidateExtractor; 4] =
    [&NpcExtractor, &LocationExtractor, &ItemExtractor, &QuestExtractor];
