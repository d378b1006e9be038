use extract::{IdentifiedEntity, title_key};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Entities sharing kind and normalized title, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub key: String,
    pub members: Vec<IdentifiedEntity>,
}

impl DuplicateGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.id.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DuplicateReport {
    pub groups: Vec<DuplicateGroup>,
    pub member_ids: HashSet<String>,
}

impl DuplicateReport {
    /// All duplicate members as one list, group by group
    pub fn flattened(&self) -> Vec<&IdentifiedEntity> {
        self.groups.iter().flat_map(|g| g.members.iter()).collect()
    }

    pub fn is_duplicate(&self, id: &str) -> bool {
        self.member_ids.contains(id)
    }
}

/// Partition entities by `(kind, trimmed lowercase title)`. Singletons included.
pub fn group_by_key(entities: &[IdentifiedEntity]) -> Vec<DuplicateGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for entity in entities {
        let key = title_key(entity.kind(), entity.title());
        match index.get(&key) {
            Some(&i) => groups[i].members.push(entity.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup {
                    key,
                    members: vec![entity.clone()],
                });
            }
        }
    }

    groups
}

/// Groups with more than one member, plus the ids of every such member
pub fn find_duplicate_groups(entities: &[IdentifiedEntity]) -> DuplicateReport {
    let groups: Vec<DuplicateGroup> = group_by_key(entities)
        .into_iter()
        .filter(DuplicateGroup::is_duplicate)
        .collect();
    let member_ids = groups
        .iter()
        .flat_map(|g| g.ids().map(str::to_string))
        .collect();

    DuplicateReport { groups, member_ids }
}
