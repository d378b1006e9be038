use extract::{
    Entity, EntityDetails, EntityKind, ExtractionConfig, Extractor, TermDictionary, assign_ids,
    extract,
};
use ingest::{SourceContent, StructureParser};

const SESSION_NOTES: &str = "\
# 3. Trouble at the Yawning Portal

## Synopsis
The party met Volothamp Geddarm at the Yawning Portal. Volo asked us to rescue Floon.

## Events
Durnan the barkeep poured drinks while Captain Zord watched from a corner.
A halfling named Pip Tealeaf sold us a Potion of Healing.
Later we travelled into Greywater, a small fishing village.
Yagra Stonefist, a Zhentarim thug, said nothing.

## Loot
- Bag of Holding (uncommon)
";

fn parse(filename: &str, text: &str) -> SourceContent {
    StructureParser::default().parse(filename, text)
}

#[test]
fn test_full_session_document() {
    let content = parse("session_3.md", SESSION_NOTES);
    let entities = extract(&content);

    let session = &entities[0];
    assert_eq!(session.kind(), EntityKind::SessionSummary);
    assert_eq!(session.title, "Trouble at the Yawning Portal");
    match &session.details {
        EntityDetails::SessionSummary(details) => {
            assert_eq!(details.session_number, Some(3));
            assert_eq!(
                details.synopsis.as_deref(),
                Some("The party met Volothamp Geddarm at the Yawning Portal. Volo asked us to rescue Floon.")
            );
            assert_eq!(details.summary.as_deref(), Some(SESSION_NOTES));
        }
        other => panic!("unexpected details {:?}", other),
    }

    let titles_of = |kind: EntityKind| -> Vec<&str> {
        entities
            .iter()
            .filter(|e| e.kind() == kind)
            .map(|e| e.title.as_str())
            .collect()
    };

    let npcs = titles_of(EntityKind::Npc);
    for expected in ["Durnan", "Volothamp Geddarm", "Yagra Stonefist", "Captain Zord", "Pip Tealeaf"] {
        assert!(npcs.contains(&expected), "missing npc {expected}: {npcs:?}");
    }
    assert!(!npcs.contains(&"Synopsis"));

    let locations = titles_of(EntityKind::Location);
    assert!(locations.contains(&"Yawning Portal"));
    assert!(locations.contains(&"Greywater"));

    assert_eq!(titles_of(EntityKind::Item), vec!["Bag of Holding", "Potion of Healing"]);
    assert_eq!(titles_of(EntityKind::Quest), vec!["Rescue Floon"]);

    for entity in entities.iter().skip(1) {
        assert_eq!(entity.source_sessions, Some(vec![3]), "{}", entity.title);
    }
}

#[test]
fn test_every_title_non_empty() {
    let samples = [
        SESSION_NOTES,
        "",
        "   \n\n",
        "... !!! ???",
        "Named said. Called named. In The. At the .",
        "# \n## Synopsis\n",
    ];
    for text in samples {
        for entity in extract(&parse("notes.md", text)) {
            assert!(!entity.title.trim().is_empty());
        }
    }
}

#[test]
fn test_scenario_durnan_barkeep() {
    let content = SourceContent::from_plain("notes.txt", "Durnan the barkeep poured ale.", vec![]);
    let entities = extract(&content);

    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].title, "Durnan");
    match &entities[0].details {
        EntityDetails::Npc(npc) => assert_eq!(npc.role.as_deref(), Some("barkeep")),
        other => panic!("unexpected details {:?}", other),
    }
}

#[test]
fn test_scenario_no_session_hint() {
    let content = parse("notes.md", "# Tavern Night\nDurnan poured ale at the Yawning Portal.");
    let entities = extract(&content);

    assert!(!entities.is_empty());
    assert!(entities.iter().all(|e| e.kind() != EntityKind::SessionSummary));
    assert!(entities.iter().all(|e| e.source_sessions.is_none()));
}

#[test]
fn test_possession_is_not_a_session_hint() {
    let content = parse(
        "notes.md",
        "# Tavern Night\nDurnan took possession 2 days ago of the Yawning Portal.",
    );
    let entities = extract(&content);

    assert!(!entities.is_empty());
    assert!(entities.iter().all(|e| e.kind() != EntityKind::SessionSummary));
    assert!(entities.iter().all(|e| e.source_sessions.is_none()));
}

#[test]
fn test_extraction_is_deterministic() {
    let content = parse("session_3.md", SESSION_NOTES);
    let first = assign_ids(extract(&content));
    let second = assign_ids(extract(&content));
    assert_eq!(first, second);
    assert_eq!(first[0].id, "session-summary-0");
    assert_eq!(first[1].id, "npc-1");
}

#[test]
fn test_injected_dictionary_and_gates() {
    let dictionary = TermDictionary {
        npc_names: vec!["Zord".to_string()],
        ..TermDictionary::default()
    };
    let mut config = ExtractionConfig::default();
    config.npc_gate.max_len = 5;

    let extractor = Extractor::new(dictionary, config);
    let content = SourceContent::from_plain(
        "notes.md",
        "Zord smiled. A gnome named Bartholomew Quill waved.",
        vec![],
    );
    let titles: Vec<String> = extractor
        .extract(&content)
        .into_iter()
        .filter(|e| e.kind() == EntityKind::Npc)
        .map(|e: Entity| e.title)
        .collect();

    assert_eq!(titles, vec!["Zord"]);
}
