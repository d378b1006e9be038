use extract::{
    EntityKind, Importance, ItemType, LocationType, NpcStatus, QuestStatus, QuestType, Rarity,
    SessionStatus,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::MergeError;

/// Declared type of a merge field. `Flag` and `Select` are enumerated: they only
/// ever take a value some group member already has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    LongText,
    Number,
    Flag,
    List,
    Sessions,
    Select(&'static [&'static str]),
}

impl FieldType {
    pub fn is_enumerated(&self) -> bool {
        matches!(self, FieldType::Flag | FieldType::Select(_))
    }

    /// Convert typed-in text into a field value. Enumerated types never reach here
    /// through the editor API.
    pub fn parse_custom(&self, field: &str, raw: &str) -> Result<Value, MergeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(MergeError::EmptyCustomValue {
                field: field.to_string(),
            });
        }

        let invalid = |reason: &str| MergeError::InvalidCustomValue {
            field: field.to_string(),
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        match self {
            FieldType::Text | FieldType::LongText => Ok(Value::String(raw.to_string())),
            FieldType::Number => raw
                .parse::<u32>()
                .map(Value::from)
                .map_err(|_| invalid("expected a whole number")),
            FieldType::List => Ok(Value::from(split_list(raw))),
            FieldType::Sessions => split_list(raw)
                .iter()
                .map(|n| n.parse::<u32>().map(Value::from))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
                .map_err(|_| invalid("expected comma-separated session numbers")),
            FieldType::Flag | FieldType::Select(_) => Err(invalid("field only accepts existing values")),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub field_type: FieldType,
}

const fn spec(name: &'static str, label: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        label,
        field_type,
    }
}

const COMMON: &[FieldSpec] = &[
    spec("title", "Title", FieldType::Text),
    spec("tags", "Tags", FieldType::List),
    spec("sourceSessions", "Sessions", FieldType::Sessions),
];

const NPC: &[FieldSpec] = &[
    spec("role", "Role", FieldType::Text),
    spec("faction", "Faction", FieldType::Text),
    spec("importance", "Importance", FieldType::Select(Importance::OPTIONS)),
    spec("race", "Race", FieldType::Text),
    spec("class", "Class", FieldType::Text),
    spec("location", "Location", FieldType::Text),
    spec("status", "Status", FieldType::Select(NpcStatus::OPTIONS)),
    spec("description", "Description", FieldType::LongText),
];

const LOCATION: &[FieldSpec] = &[
    spec("region", "Region", FieldType::Text),
    spec("type", "Type", FieldType::Select(LocationType::OPTIONS)),
    spec("parent", "Parent location", FieldType::Text),
    spec("description", "Description", FieldType::LongText),
];

const ITEM: &[FieldSpec] = &[
    spec("type", "Type", FieldType::Select(ItemType::OPTIONS)),
    spec("rarity", "Rarity", FieldType::Select(Rarity::OPTIONS)),
    spec("attunement", "Requires attunement", FieldType::Flag),
    spec("owner", "Owner", FieldType::Text),
    spec("description", "Description", FieldType::LongText),
];

const QUEST: &[FieldSpec] = &[
    spec("status", "Status", FieldType::Select(QuestStatus::OPTIONS)),
    spec("type", "Type", FieldType::Select(QuestType::OPTIONS)),
    spec("giver", "Quest giver", FieldType::Text),
    spec("reward", "Reward", FieldType::Text),
    spec("description", "Description", FieldType::LongText),
];

const PLAYER: &[FieldSpec] = &[
    spec("playerName", "Player", FieldType::Text),
    spec("race", "Race", FieldType::Text),
    spec("class", "Class", FieldType::Text),
    spec("level", "Level", FieldType::Number),
];

const SESSION_SUMMARY: &[FieldSpec] = &[
    spec("sessionNumber", "Session number", FieldType::Number),
    spec("date", "Date", FieldType::Text),
    spec("status", "Status", FieldType::Select(SessionStatus::OPTIONS)),
    spec("synopsis", "Synopsis", FieldType::LongText),
    spec("summary", "Summary", FieldType::LongText),
];

const SESSION_PREP: &[FieldSpec] = &[
    spec("sessionNumber", "Session number", FieldType::Number),
    spec("date", "Date", FieldType::Text),
    spec("status", "Status", FieldType::Select(SessionStatus::OPTIONS)),
    spec("goals", "Goals", FieldType::LongText),
];

/// Mergeable fields of a kind, common fields first. `kind` itself is never listed.
pub fn fields_for(kind: EntityKind) -> Vec<FieldSpec> {
    let specific = match kind {
        EntityKind::Npc => NPC,
        EntityKind::Location => LOCATION,
        EntityKind::Item => ITEM,
        EntityKind::Quest => QUEST,
        EntityKind::Player => PLAYER,
        EntityKind::SessionSummary => SESSION_SUMMARY,
        EntityKind::SessionPrep => SESSION_PREP,
    };
    COMMON.iter().chain(specific).copied().collect()
}

pub fn field_spec(kind: EntityKind, name: &str) -> Option<FieldSpec> {
    fields_for(kind).into_iter().find(|f| f.name == name)
}

/// Defined and non-empty
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::{Entity, EntityDetails, ItemDetails};
    use serde_json::json;

    #[test]
    fn test_catalogue_matches_serialized_keys() {
        let entity = Entity::new(
            "Flame Tongue",
            EntityDetails::Item(ItemDetails {
                item_type: Some(ItemType::Weapon),
                rarity: Some(Rarity::Rare),
                attunement: Some(true),
                owner: Some("Durnan".to_string()),
                description: Some("Burns.".to_string()),
            }),
        )
        .unwrap()
        .with_session(Some(1));
        let value = serde_json::to_value(&entity).unwrap();
        let object = value.as_object().unwrap();

        for key in object.keys().filter(|k| *k != "kind") {
            assert!(field_spec(EntityKind::Item, key).is_some(), "no spec for {key}");
        }
    }

    #[test]
    fn test_select_options_are_serialized_values() {
        let value = serde_json::to_value(Rarity::VeryRare).unwrap();
        assert!(Rarity::OPTIONS.contains(&value.as_str().unwrap()));
        let value = serde_json::to_value(QuestStatus::OnHold).unwrap();
        assert!(QuestStatus::OPTIONS.contains(&value.as_str().unwrap()));
    }

    #[test]
    fn test_kind_is_never_a_field() {
        for kind in EntityKind::ALL {
            assert!(field_spec(kind, "kind").is_none());
            assert!(field_spec(kind, "id").is_none());
        }
    }

    #[test]
    fn test_parse_custom() {
        assert_eq!(FieldType::Text.parse_custom("role", " barkeep ").unwrap(), json!("barkeep"));
        assert_eq!(
            FieldType::List.parse_custom("tags", "ally, , waterdeep").unwrap(),
            json!(["ally", "waterdeep"])
        );
        assert_eq!(FieldType::Sessions.parse_custom("sourceSessions", "1, 3").unwrap(), json!([1, 3]));
        assert!(FieldType::Number.parse_custom("level", "-2").is_err());
        assert!(matches!(
            FieldType::Text.parse_custom("title", "   "),
            Err(MergeError::EmptyCustomValue { .. })
        ));
        assert!(FieldType::Flag.parse_custom("attunement", "yes").is_err());
    }

    #[test]
    fn test_presence() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!("  ")));
        assert!(!is_present(&json!([])));
        assert!(is_present(&json!(false)));
        assert!(is_present(&json!("Zhentarim")));
    }
}
