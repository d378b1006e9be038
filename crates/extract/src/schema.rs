use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Npc,
    Location,
    Item,
    Quest,
    Player,
    SessionSummary,
    SessionPrep,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Npc,
        EntityKind::Location,
        EntityKind::Item,
        EntityKind::Quest,
        EntityKind::Player,
        EntityKind::SessionSummary,
        EntityKind::SessionPrep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Npc => "npc",
            EntityKind::Location => "location",
            EntityKind::Item => "item",
            EntityKind::Quest => "quest",
            EntityKind::Player => "player",
            EntityKind::SessionSummary => "session-summary",
            EntityKind::SessionPrep => "session-prep",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Importance {
    Minor,
    Supporting,
    Major,
}

impl Importance {
    pub const OPTIONS: &'static [&'static str] = &["minor", "supporting", "major"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NpcStatus {
    Alive,
    Dead,
    Missing,
    Unknown,
}

impl NpcStatus {
    pub const OPTIONS: &'static [&'static str] = &["alive", "dead", "missing", "unknown"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationType {
    City,
    Town,
    Village,
    Tavern,
    Shop,
    Temple,
    Castle,
    Dungeon,
    Wilderness,
    Landmark,
    Other,
}

impl LocationType {
    pub const OPTIONS: &'static [&'static str] = &[
        "city",
        "town",
        "village",
        "tavern",
        "shop",
        "temple",
        "castle",
        "dungeon",
        "wilderness",
        "landmark",
        "other",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    Weapon,
    Armor,
    Potion,
    Scroll,
    Wand,
    Staff,
    Rod,
    Ring,
    Wondrous,
    Artifact,
    Other,
}

impl ItemType {
    pub const OPTIONS: &'static [&'static str] = &[
        "weapon", "armor", "potion", "scroll", "wand", "staff", "rod", "ring", "wondrous",
        "artifact", "other",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    VeryRare,
    Legendary,
    Artifact,
}

impl Rarity {
    pub const OPTIONS: &'static [&'static str] =
        &["common", "uncommon", "rare", "very-rare", "legendary", "artifact"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
    OnHold,
}

impl QuestStatus {
    pub const OPTIONS: &'static [&'static str] = &["active", "completed", "failed", "on-hold"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestType {
    Main,
    Side,
    Personal,
    Faction,
}

impl QuestType {
    pub const OPTIONS: &'static [&'static str] = &["main", "side", "personal", "faction"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Draft,
    Complete,
}

impl SessionStatus {
    pub const OPTIONS: &'static [&'static str] = &["draft", "complete"];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NpcStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<LocationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attunement: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<QuestStatus>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub quest_type: Option<QuestType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPrepDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
}

/// Kind-specific attributes; the variant is the entity's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EntityDetails {
    Npc(NpcDetails),
    Location(LocationDetails),
    Item(ItemDetails),
    Quest(QuestDetails),
    Player(PlayerDetails),
    SessionSummary(SessionSummaryDetails),
    SessionPrep(SessionPrepDetails),
}

impl EntityDetails {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityDetails::Npc(_) => EntityKind::Npc,
            EntityDetails::Location(_) => EntityKind::Location,
            EntityDetails::Item(_) => EntityKind::Item,
            EntityDetails::Quest(_) => EntityKind::Quest,
            EntityDetails::Player(_) => EntityKind::Player,
            EntityDetails::SessionSummary(_) => EntityKind::SessionSummary,
            EntityDetails::SessionPrep(_) => EntityKind::SessionPrep,
        }
    }
}

/// One campaign concept. Serializes as a single flat object keyed by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_sessions: Option<Vec<u32>>,
    #[serde(flatten)]
    pub details: EntityDetails,
}

impl Entity {
    /// Returns `None` for a blank title: every entity carries a display name.
    pub fn new(title: &str, details: EntityDetails) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        Some(Self {
            title: title.to_string(),
            tags: Vec::new(),
            source_sessions: None,
            details,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.details.kind()
    }

    pub fn with_session(mut self, session: Option<u32>) -> Self {
        self.source_sessions = session.map(|n| vec![n]);
        self
    }

    pub fn session_number(&self) -> Option<u32> {
        match &self.details {
            EntityDetails::SessionSummary(s) => s.session_number,
            EntityDetails::SessionPrep(s) => s.session_number,
            _ => None,
        }
    }
}

/// An entity plus its id within one extraction run (e.g. `npc-0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedEntity {
    pub id: String,
    #[serde(flatten)]
    pub entity: Entity,
}

impl IdentifiedEntity {
    pub fn new(id: impl Into<String>, entity: Entity) -> Self {
        Self {
            id: id.into(),
            entity,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }

    pub fn title(&self) -> &str {
        &self.entity.title
    }
}
