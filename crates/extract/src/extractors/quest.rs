use regex::{Regex, escape};
use tracing::warn;

use super::CandidateExtractor;
use crate::context::{ExtractionContext, contains_keyword, contains_term, first_name};
use crate::dictionary::TermDictionary;
use crate::normalizer::{SeenTitles, clean_discovered_name};
use crate::schema::{Entity, EntityDetails, EntityKind, QuestDetails, QuestStatus, QuestType};

const GIVER_VERBS: &[&str] = &["asked", "hired", "tasked", "begged", "offered", "paid"];
const CLAUSE_BREAKS: &[&str] = &[
    "after", "and", "because", "before", "but", "by", "for", "from", "since", "so", "until",
    "while", "with",
];
const TRAILING_FILLER: &[&str] = &[
    "a", "an", "and", "at", "by", "for", "from", "in", "of", "on", "the", "to", "with",
];

fn alternation(words: &[String]) -> String {
    words
        .iter()
        .map(|w| escape(w.trim()).replace(' ', r"[ \t]+"))
        .collect::<Vec<_>>()
        .join("|")
}

/// "rescue Floon", "find the Stone of Golorr"
fn verb_pattern(dict: &TermDictionary) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"\b(?i:({}))[ \t]+((?:(?i:the)[ \t]+)?[A-Z][\w'’-]*(?:[ \t]+(?:of[ \t]+(?:the[ \t]+)?)?[A-Z][\w'’-]*){{0,3}})",
        alternation(&dict.quest_verbs)
    ))
}

/// "mission to Neverwinter", "job to guard the caravan"
fn noun_pattern(dict: &TermDictionary) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"\b(?i:({}))[ \t]+to[ \t]+([\w'’-]+(?:[ \t]+[\w'’-]+){{0,4}})",
        alternation(&dict.quest_nouns)
    ))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cut the target at the first clause break and drop dangling filler words
fn trim_target(target: &str) -> String {
    let mut words: Vec<&str> = target
        .split_whitespace()
        .enumerate()
        .take_while(|(i, w)| *i == 0 || !CLAUSE_BREAKS.contains(&w.to_lowercase().as_str()))
        .map(|(_, w)| w)
        .collect();
    while words
        .last()
        .is_some_and(|w| TRAILING_FILLER.contains(&w.to_lowercase().as_str()))
    {
        words.pop();
    }
    words.join(" ")
}

fn quest_title(lead: &str, connector: Option<&str>, target: &str) -> Option<String> {
    let target = trim_target(&clean_discovered_name(target));
    if target.is_empty() {
        return None;
    }
    let lead = capitalize(&lead.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase());
    Some(match connector {
        Some(connector) => format!("{} {} {}", lead, connector, target),
        None => format!("{} {}", lead, target),
    })
}

fn quest_type(sentence: &str, dict: &TermDictionary) -> Option<QuestType> {
    if first_name(&[sentence], &dict.factions).is_some() {
        Some(QuestType::Faction)
    } else if contains_keyword(sentence, "personal") {
        Some(QuestType::Personal)
    } else if contains_keyword(sentence, "main") {
        Some(QuestType::Main)
    } else if contains_keyword(sentence, "side") {
        Some(QuestType::Side)
    } else {
        None
    }
}

fn quest_giver(sentence: &str, dict: &TermDictionary) -> Option<String> {
    dict.npc_names
        .iter()
        .find(|npc| {
            GIVER_VERBS
                .iter()
                .any(|verb| contains_term(sentence, &format!("{} {}", npc, verb)))
        })
        .cloned()
}

fn build_quest(ctx: &ExtractionContext<'_>, title: &str, sentence: Option<&str>) -> Option<Entity> {
    let dict = ctx.dictionary;
    let details = QuestDetails {
        status: Some(QuestStatus::Active),
        quest_type: sentence.and_then(|s| quest_type(s, dict)),
        giver: sentence.and_then(|s| quest_giver(s, dict)),
        ..Default::default()
    };

    Entity::new(title, EntityDetails::Quest(details)).map(|e| e.with_session(ctx.session))
}

/// Verb and noun patterns compiled from one dictionary. Built once per `Extractor`
/// and shared by every document it processes.
#[derive(Debug, Clone, Default)]
pub struct QuestPatterns {
    verbs: Option<Regex>,
    nouns: Option<Regex>,
}

impl QuestPatterns {
    pub fn new(dict: &TermDictionary) -> Result<Self, regex::Error> {
        // An empty alternation would match every capitalized word
        let verbs = (!dict.quest_verbs.is_empty())
            .then(|| verb_pattern(dict))
            .transpose()?;
        let nouns = (!dict.quest_nouns.is_empty())
            .then(|| noun_pattern(dict))
            .transpose()?;
        Ok(Self { verbs, nouns })
    }

    /// Compile, or fall back to no patterns (known titles only) with a warning
    pub fn compile_or_empty(dict: &TermDictionary) -> Self {
        Self::new(dict).unwrap_or_else(|e| {
            warn!(error = %e, "Quest patterns could not be built from the dictionary");
            Self::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_none() && self.nouns.is_none()
    }

    /// Quest titles built from one sentence, verb phrases first
    fn titles(&self, sentence: &str) -> Vec<String> {
        let verb_titles = self
            .verbs
            .iter()
            .flat_map(|re| re.captures_iter(sentence))
            .filter_map(|c| quest_title(c.get(1)?.as_str(), None, c.get(2)?.as_str()));
        let noun_titles = self
            .nouns
            .iter()
            .flat_map(|re| re.captures_iter(sentence))
            .filter_map(|c| quest_title(c.get(1)?.as_str(), Some("to"), c.get(2)?.as_str()));

        verb_titles.chain(noun_titles).collect()
    }
}

pub struct QuestExtractor;

impl CandidateExtractor for QuestExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::Quest
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<Entity> {
        let mut found = SeenTitles::new();
        let mut entities = Vec::new();

        for title in &ctx.dictionary.quest_titles {
            if found.contains(title) || !ctx.view.mentions(title) {
                continue;
            }
            let sentence = ctx.view.sentences_mentioning(title).first().copied();
            if let Some(entity) = build_quest(ctx, title, sentence) {
                found.insert(title);
                entities.push(entity);
            }
        }

        for sentence in ctx.view.sentences().iter().copied() {
            for title in ctx.quest_patterns.titles(sentence) {
                if found.contains(&title) {
                    continue;
                }
                if let Some(entity) = build_quest(ctx, &title, Some(sentence)) {
                    found.insert(&title);
                    entities.push(entity);
                }
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

    fn run(text: &str) -> Vec<Entity> {
        let view = DocumentView::new(text);
        let dictionary = TermDictionary::default();
        let config = ExtractionConfig::default();
        let patterns = QuestPatterns::new(&dictionary).unwrap();
        let ctx = ExtractionContext {
            view: &view,
            dictionary: &dictionary,
            config: &config,
            quest_patterns: &patterns,
            session: None,
        };
        QuestExtractor.extract(&ctx)
    }

    fn quest(entity: &Entity) -> &QuestDetails {
        match &entity.details {
            EntityDetails::Quest(d) => d,
            other => panic!("expected quest, got {:?}", other),
        }
    }

    #[test]
    fn test_verb_target_titles() {
        let entities = run("Volo asked us to rescue Floon. Later we agreed to find the Stone of Golorr.");
        let titles: Vec<_> = entities.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Rescue Floon", "Find the Stone of Golorr"]);
        assert!(entities.iter().all(|e| quest(e).status == Some(QuestStatus::Active)));
    }

    #[test]
    fn test_noun_to_target_titles() {
        let entities = run("Mirt offered a mission to Neverwinter for the Harpers.");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].title, "Mission to Neverwinter");
        assert_eq!(quest(&entities[0]).quest_type, Some(QuestType::Faction));
    }

    #[test]
    fn test_known_title_and_giver() {
        let entities = run("Durnan asked us: Find Floon before dawn. We must find Floon!");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].title, "Find Floon");
        assert_eq!(quest(&entities[0]).giver.as_deref(), Some("Durnan"));
    }

    #[test]
    fn test_empty_vocabulary_builds_no_patterns() {
        let dictionary = TermDictionary {
            quest_verbs: Vec::new(),
            quest_nouns: Vec::new(),
            ..TermDictionary::default()
        };
        let patterns = QuestPatterns::new(&dictionary).unwrap();
        assert!(patterns.is_empty());
        assert!(patterns.titles("We must rescue Floon.").is_empty());
        assert!(!QuestPatterns::new(&TermDictionary::default()).unwrap().is_empty());
    }

    #[test]
    fn test_giver_from_sentence() {
        let entities = run("Renaer Neverember hired us to track down Krentz.");
        assert_eq!(entities[0].title, "Track down Krentz");
        assert_eq!(quest(&entities[0]).giver.as_deref(), Some("Renaer Neverember"));
    }

    #[test]
    fn test_lowercase_targets_ignored() {
        assert!(run("We need to find some food and stop for the night.").is_empty());
    }
}
