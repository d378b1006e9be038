use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::schema::{Importance, ItemType, LocationType, Rarity};

/// Hand-authored attributes for a known NPC; these win over inferred values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NpcOverride {
    pub role: Option<String>,
    pub faction: Option<String>,
    pub race: Option<String>,
    pub class: Option<String>,
    pub importance: Option<Importance>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationOverride {
    #[serde(rename = "type")]
    pub location_type: Option<LocationType>,
    pub region: Option<String>,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemOverride {
    #[serde(rename = "type")]
    pub item_type: Option<ItemType>,
    pub rarity: Option<Rarity>,
    pub attunement: Option<bool>,
}

/// Static campaign vocabulary handed to every extractor.
///
/// Every `(keyword, value)` list is ordered: the first keyword that matches wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TermDictionary {
    pub npc_names: Vec<String>,
    pub location_names: Vec<String>,
    pub item_names: Vec<String>,
    pub quest_titles: Vec<String>,

    pub npc_overrides: HashMap<String, NpcOverride>,
    pub location_overrides: HashMap<String, LocationOverride>,
    pub item_overrides: HashMap<String, ItemOverride>,

    pub roles: Vec<(String, String)>,
    pub races: Vec<(String, String)>,
    pub classes: Vec<(String, String)>,
    pub location_types: Vec<(String, LocationType)>,
    pub item_types: Vec<(String, ItemType)>,
    pub rarities: Vec<(String, Rarity)>,

    pub factions: Vec<String>,
    pub regions: Vec<String>,

    /// Verbs that open a quest phrase ("rescue", "track down")
    pub quest_verbs: Vec<String>,
    /// Nouns that open a "<noun> to <target>" quest phrase
    pub quest_nouns: Vec<String>,

    /// Words that look like names but are document structure or filler
    pub stop_words: Vec<String>,
}

impl TermDictionary {
    /// Parse a dictionary from JSON; missing sections fall back to the built-in ones
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse dictionary")
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn npc(role: &str, faction: Option<&str>, race: Option<&str>) -> NpcOverride {
    NpcOverride {
        role: Some(role.to_string()),
        faction: faction.map(str::to_string),
        race: race.map(str::to_string),
        ..Default::default()
    }
}

fn location(location_type: LocationType, region: Option<&str>, parent: Option<&str>) -> LocationOverride {
    LocationOverride {
        location_type: Some(location_type),
        region: region.map(str::to_string),
        parent: parent.map(str::to_string),
    }
}

fn item(item_type: ItemType, rarity: Rarity, attunement: bool) -> ItemOverride {
    ItemOverride {
        item_type: Some(item_type),
        rarity: Some(rarity),
        attunement: Some(attunement),
    }
}

impl Default for TermDictionary {
    fn default() -> Self {
        let npc_overrides = HashMap::from([
            ("Volothamp Geddarm".to_string(), NpcOverride {
                importance: Some(Importance::Major),
                ..npc("author", None, Some("human"))
            }),
            ("Laeral Silverhand".to_string(), npc("Open Lord of Waterdeep", Some("Lords' Alliance"), Some("human"))),
            ("Renaer Neverember".to_string(), npc("noble", None, Some("human"))),
            ("Xanathar".to_string(), npc("crime lord", Some("Xanathar Guild"), Some("beholder"))),
            ("Manshoon".to_string(), npc("wizard", Some("Zhentarim"), Some("human"))),
            ("Jarlaxle Baenre".to_string(), npc("pirate captain", Some("Bregan D'aerthe"), Some("drow"))),
            ("Vajra Safahr".to_string(), npc("Blackstaff", Some("Force Grey"), Some("human"))),
            ("Mirt".to_string(), npc("moneylender", Some("Harpers"), Some("human"))),
            ("Davil Starsong".to_string(), npc("entertainer", Some("Zhentarim"), Some("elf"))),
            ("Victoro Cassalanter".to_string(), npc("noble", None, Some("human"))),
            ("Nihiloor".to_string(), npc("interrogator", Some("Xanathar Guild"), Some("mind flayer"))),
        ]);

        let location_overrides = HashMap::from([
            ("Waterdeep".to_string(), location(LocationType::City, Some("Sword Coast"), None)),
            ("Yawning Portal".to_string(), location(LocationType::Tavern, Some("Castle Ward"), Some("Waterdeep"))),
            ("Trollskull Manor".to_string(), location(LocationType::Tavern, Some("North Ward"), Some("Waterdeep"))),
            ("Skewered Dragon".to_string(), location(LocationType::Tavern, Some("Dock Ward"), Some("Waterdeep"))),
            ("Undermountain".to_string(), location(LocationType::Dungeon, None, Some("Waterdeep"))),
            ("Neverwinter".to_string(), location(LocationType::City, Some("Sword Coast"), None)),
            ("Baldur's Gate".to_string(), location(LocationType::City, Some("Sword Coast"), None)),
            ("Candlekeep".to_string(), location(LocationType::Landmark, Some("Sword Coast"), None)),
            ("Phandalin".to_string(), location(LocationType::Town, Some("Sword Coast"), None)),
            ("Castle Ward".to_string(), location(LocationType::Other, None, Some("Waterdeep"))),
            ("Dock Ward".to_string(), location(LocationType::Other, None, Some("Waterdeep"))),
            ("North Ward".to_string(), location(LocationType::Other, None, Some("Waterdeep"))),
            ("Trades Ward".to_string(), location(LocationType::Other, None, Some("Waterdeep"))),
            ("Sea Ward".to_string(), location(LocationType::Other, None, Some("Waterdeep"))),
        ]);

        let item_overrides = HashMap::from([
            ("Stone of Golorr".to_string(), item(ItemType::Artifact, Rarity::Artifact, true)),
            ("Dragonstaff of Ahghairon".to_string(), item(ItemType::Staff, Rarity::Legendary, true)),
            ("Flame Tongue".to_string(), item(ItemType::Weapon, Rarity::Rare, true)),
            ("Bag of Holding".to_string(), item(ItemType::Wondrous, Rarity::Uncommon, false)),
            ("Potion of Healing".to_string(), item(ItemType::Potion, Rarity::Common, false)),
            ("Immovable Rod".to_string(), item(ItemType::Rod, Rarity::Uncommon, false)),
        ]);

        Self {
            npc_names: strings(&[
                "Durnan",
                "Volothamp Geddarm",
                "Laeral Silverhand",
                "Renaer Neverember",
                "Floon Blagmaar",
                "Yagra Stonefist",
                "Bonnie",
                "Jarlaxle Baenre",
                "Manshoon",
                "Xanathar",
                "Vajra Safahr",
                "Mirt",
                "Davil Starsong",
                "Istrid Horn",
                "Meloon Wardragon",
                "Victoro Cassalanter",
                "Ammalia Cassalanter",
                "Nihiloor",
                "Emmek Frewn",
                "Vincent Trench",
            ]),
            location_names: strings(&[
                "Waterdeep",
                "Yawning Portal",
                "Trollskull Manor",
                "Skewered Dragon",
                "Undermountain",
                "Neverwinter",
                "Baldur's Gate",
                "Candlekeep",
                "Phandalin",
                "Castle Ward",
                "Dock Ward",
                "North Ward",
                "Trades Ward",
                "Sea Ward",
            ]),
            item_names: strings(&[
                "Stone of Golorr",
                "Dragonstaff of Ahghairon",
                "Flame Tongue",
                "Bag of Holding",
                "Potion of Healing",
                "Immovable Rod",
                "Cloak of Elvenkind",
                "Boots of Elvenkind",
                "Wand of Magic Missiles",
                "Ring of Protection",
                "Sword of Sharpness",
                "Gauntlets of Ogre Power",
                "Scroll of Fireball",
            ]),
            quest_titles: strings(&[
                "Find Floon",
                "Recover the Stone of Golorr",
                "Open the Vault of Dragons",
                "Stop the Xanathar Guild",
            ]),

            npc_overrides,
            location_overrides,
            item_overrides,

            roles: pairs(&[
                ("barkeep", "barkeep"),
                ("bartender", "bartender"),
                ("innkeeper", "innkeeper"),
                ("shopkeeper", "shopkeeper"),
                ("merchant", "merchant"),
                ("blacksmith", "blacksmith"),
                ("smith", "blacksmith"),
                ("captain", "captain"),
                ("guard", "guard"),
                ("soldier", "soldier"),
                ("priestess", "priest"),
                ("priest", "priest"),
                ("wizard", "wizard"),
                ("mage", "wizard"),
                ("sage", "sage"),
                ("noble", "noble"),
                ("lord", "noble"),
                ("lady", "noble"),
                ("thief", "thief"),
                ("assassin", "assassin"),
                ("spy", "spy"),
                ("informant", "informant"),
                ("bandit", "bandit"),
                ("cultist", "cultist"),
                ("mayor", "mayor"),
                ("king", "king"),
                ("queen", "queen"),
            ]),
            races: pairs(&[
                ("half-elf", "half-elf"),
                ("half-orc", "half-orc"),
                ("halfling", "halfling"),
                ("dwarven", "dwarf"),
                ("dwarf", "dwarf"),
                ("drow", "drow"),
                ("elven", "elf"),
                ("elf", "elf"),
                ("gnome", "gnome"),
                ("tiefling", "tiefling"),
                ("dragonborn", "dragonborn"),
                ("goblin", "goblin"),
                ("orc", "orc"),
                ("human", "human"),
            ]),
            classes: pairs(&[
                ("barbarian", "barbarian"),
                ("bard", "bard"),
                ("cleric", "cleric"),
                ("druid", "druid"),
                ("fighter", "fighter"),
                ("monk", "monk"),
                ("paladin", "paladin"),
                ("ranger", "ranger"),
                ("rogue", "rogue"),
                ("sorcerer", "sorcerer"),
                ("warlock", "warlock"),
            ]),
            location_types: vec![
                ("tavern".to_string(), LocationType::Tavern),
                ("inn".to_string(), LocationType::Tavern),
                ("alehouse".to_string(), LocationType::Tavern),
                ("shop".to_string(), LocationType::Shop),
                ("market".to_string(), LocationType::Shop),
                ("store".to_string(), LocationType::Shop),
                ("temple".to_string(), LocationType::Temple),
                ("shrine".to_string(), LocationType::Temple),
                ("castle".to_string(), LocationType::Castle),
                ("keep".to_string(), LocationType::Castle),
                ("fortress".to_string(), LocationType::Castle),
                ("dungeon".to_string(), LocationType::Dungeon),
                ("crypt".to_string(), LocationType::Dungeon),
                ("cave".to_string(), LocationType::Dungeon),
                ("sewers".to_string(), LocationType::Dungeon),
                ("city".to_string(), LocationType::City),
                ("town".to_string(), LocationType::Town),
                ("village".to_string(), LocationType::Village),
                ("hamlet".to_string(), LocationType::Village),
                ("forest".to_string(), LocationType::Wilderness),
                ("woods".to_string(), LocationType::Wilderness),
                ("mountains".to_string(), LocationType::Wilderness),
                ("swamp".to_string(), LocationType::Wilderness),
                ("tower".to_string(), LocationType::Landmark),
                ("statue".to_string(), LocationType::Landmark),
            ],
            item_types: vec![
                ("sword".to_string(), ItemType::Weapon),
                ("blade".to_string(), ItemType::Weapon),
                ("dagger".to_string(), ItemType::Weapon),
                ("axe".to_string(), ItemType::Weapon),
                ("bow".to_string(), ItemType::Weapon),
                ("crossbow".to_string(), ItemType::Weapon),
                ("mace".to_string(), ItemType::Weapon),
                ("hammer".to_string(), ItemType::Weapon),
                ("spear".to_string(), ItemType::Weapon),
                ("armor".to_string(), ItemType::Armor),
                ("shield".to_string(), ItemType::Armor),
                ("plate".to_string(), ItemType::Armor),
                ("mail".to_string(), ItemType::Armor),
                ("potion".to_string(), ItemType::Potion),
                ("elixir".to_string(), ItemType::Potion),
                ("philter".to_string(), ItemType::Potion),
                ("scroll".to_string(), ItemType::Scroll),
                ("wand".to_string(), ItemType::Wand),
                ("staff".to_string(), ItemType::Staff),
                ("rod".to_string(), ItemType::Rod),
                ("ring".to_string(), ItemType::Ring),
            ],
            rarities: vec![
                ("very rare".to_string(), Rarity::VeryRare),
                ("legendary".to_string(), Rarity::Legendary),
                ("artifact".to_string(), Rarity::Artifact),
                ("uncommon".to_string(), Rarity::Uncommon),
                ("rare".to_string(), Rarity::Rare),
                ("common".to_string(), Rarity::Common),
            ],

            factions: strings(&[
                "Zhentarim",
                "Harpers",
                "Lords' Alliance",
                "Xanathar Guild",
                "Bregan D'aerthe",
                "Emerald Enclave",
                "Order of the Gauntlet",
                "Force Grey",
                "City Watch",
            ]),
            regions: strings(&[
                "Castle Ward",
                "Dock Ward",
                "Field Ward",
                "North Ward",
                "Sea Ward",
                "Southern Ward",
                "Trades Ward",
                "Undercliff",
                "Sword Coast",
            ]),

            quest_verbs: strings(&[
                "rescue",
                "find",
                "retrieve",
                "recover",
                "deliver",
                "escort",
                "investigate",
                "stop",
                "defeat",
                "protect",
                "locate",
                "capture",
                "destroy",
                "track down",
                "hunt down",
            ]),
            quest_nouns: strings(&["mission", "quest", "task", "job", "contract", "errand"]),

            stop_words: strings(&[
                "synopsis", "description", "summary", "recap", "notes", "session", "chapter",
                "part", "scene", "npcs", "locations", "items", "quests", "loot", "the", "a",
                "an", "and", "but", "then", "when", "after", "before", "meanwhile", "later",
                "suddenly", "finally", "we", "they", "he", "she", "it", "our", "their", "his",
                "her", "party", "players", "group", "dm", "gm", "everyone", "nobody", "someone",
                "today", "tonight", "yesterday", "tomorrow", "monday", "tuesday", "wednesday",
                "thursday", "friday", "saturday", "sunday", "this", "that", "there", "here",
                "while", "once", "also", "so", "yes", "no",
            ]),
        }
    }
}
