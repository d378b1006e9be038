use std::collections::{BTreeMap, HashSet};

use extract::{Entity, EntityKind, IdentifiedEntity};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::MergeError;
use crate::fields::{FieldSpec, fields_for, field_spec, is_present};

/// One group member's value for a field under resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCandidate {
    pub entity_id: String,
    pub entity_title: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum FieldResolution {
    #[serde(rename_all = "camelCase")]
    Candidate { entity_id: String },
    Custom { value: Value },
}

/// A field whose members disagree: two or more distinct present values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposedField {
    #[serde(flatten)]
    pub spec: FieldSpec,
    pub candidates: Vec<FieldCandidate>,
    pub resolution: Option<FieldResolution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStage {
    SelectingPrimary,
    EditingFields,
    Previewing,
}

/// Result of an applied merge. The caller owns removal of `removable_ids`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub merged: IdentifiedEntity,
    pub removable_ids: Vec<String>,
}

impl MergeOutcome {
    /// Replace the primary in `entities` with the merged record and drop every
    /// removable id. Order of the survivors is kept.
    pub fn apply_to(&self, entities: Vec<IdentifiedEntity>) -> Vec<IdentifiedEntity> {
        let removable: HashSet<&str> = self.removable_ids.iter().map(String::as_str).collect();
        entities
            .into_iter()
            .filter(|e| !removable.contains(e.id.as_str()))
            .map(|e| {
                if e.id == self.merged.id {
                    self.merged.clone()
                } else {
                    e
                }
            })
            .collect()
    }
}

/// Resolution state for merging one duplicate group into a single entity.
///
/// Flow: `SelectingPrimary -> EditingFields -> Previewing`, ended by [`apply`](Self::apply)
/// or [`cancel`](Self::cancel). Both consume the session, so a finished merge cannot be
/// touched again.
#[derive(Debug, Clone)]
pub struct MergeSession {
    members: Vec<IdentifiedEntity>,
    snapshots: Vec<Map<String, Value>>,
    primary: usize,
    resolutions: BTreeMap<String, FieldResolution>,
    stage: MergeStage,
}

impl MergeSession {
    /// Start a merge. The first member is the primary until another is chosen.
    pub fn begin(members: &[IdentifiedEntity]) -> Result<Self, MergeError> {
        if members.len() < 2 {
            return Err(MergeError::InsufficientEntities {
                count: members.len(),
            });
        }

        let snapshots = members
            .iter()
            .map(|m| snapshot(&m.entity))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            primary = %members[0].id,
            members = members.len(),
            "Merge started"
        );

        Ok(Self {
            members: members.to_vec(),
            snapshots,
            primary: 0,
            resolutions: BTreeMap::new(),
            stage: MergeStage::SelectingPrimary,
        })
    }

    pub fn stage(&self) -> MergeStage {
        self.stage
    }

    pub fn members(&self) -> &[IdentifiedEntity] {
        &self.members
    }

    pub fn primary(&self) -> &IdentifiedEntity {
        &self.members[self.primary]
    }

    fn kind(&self) -> EntityKind {
        self.primary().kind()
    }

    pub fn resolution(&self, field: &str) -> Option<&FieldResolution> {
        self.resolutions.get(field)
    }

    /// Change the surviving member. Field resolutions already made are kept.
    pub fn select_primary(&mut self, entity_id: &str) -> Result<(), MergeError> {
        self.primary = self.index_of(entity_id)?;
        self.stage = MergeStage::EditingFields;
        debug!(primary = %entity_id, "Primary selected");
        Ok(())
    }

    /// Fields with at least two distinct present values, in catalogue order.
    /// A field only one member fills is not exposed; it comes from the primary as-is.
    pub fn exposed_fields(&self) -> Vec<ExposedField> {
        fields_for(self.kind())
            .into_iter()
            .filter_map(|spec| {
                let candidates = self.candidates(spec.name);
                let mut distinct: Vec<&Value> = Vec::new();
                for c in &candidates {
                    if !distinct.contains(&&c.value) {
                        distinct.push(&c.value);
                    }
                }
                let conflicting = distinct.len() > 1;

                conflicting.then(|| ExposedField {
                    spec,
                    resolution: self.resolutions.get(spec.name).cloned(),
                    candidates,
                })
            })
            .collect()
    }

    /// Every member's present value for `field`, in group order
    pub fn candidates(&self, field: &str) -> Vec<FieldCandidate> {
        self.members
            .iter()
            .zip(&self.snapshots)
            .filter_map(|(member, snap)| {
                snap.get(field).filter(|v| is_present(v)).map(|value| FieldCandidate {
                    entity_id: member.id.clone(),
                    entity_title: member.title().to_string(),
                    value: value.clone(),
                })
            })
            .collect()
    }

    /// Editor for one exposed field. Enumerated fields get a [`ChoiceEditor`], which
    /// has no way to enter a custom value.
    pub fn field_editor(&mut self, field: &str) -> Result<FieldEditor<'_>, MergeError> {
        let spec = self.exposed_spec(field)?;
        let editor = if spec.field_type.is_enumerated() {
            FieldEditor::Choice(ChoiceEditor {
                session: self,
                spec,
            })
        } else {
            FieldEditor::FreeForm(FreeFormEditor {
                session: self,
                spec,
            })
        };
        Ok(editor)
    }

    /// Take `field` from the given member. Replaces any custom text for that field.
    pub fn select_candidate(&mut self, field: &str, entity_id: &str) -> Result<(), MergeError> {
        let spec = self.exposed_spec(field)?;
        self.select_for(spec, entity_id)
    }

    /// Drop the resolution for `field`, falling back to the primary's value
    pub fn clear_resolution(&mut self, field: &str) -> Option<FieldResolution> {
        self.stage = MergeStage::EditingFields;
        self.resolutions.remove(field)
    }

    /// The merged record as it would be applied right now
    pub fn preview(&mut self) -> Result<IdentifiedEntity, MergeError> {
        let merged = self.merged()?;
        self.stage = MergeStage::Previewing;
        Ok(merged)
    }

    /// Primary's fields overwritten by every current resolution. `id` and `kind`
    /// always come from the primary.
    pub fn merged(&self) -> Result<IdentifiedEntity, MergeError> {
        let mut fields = self.snapshots[self.primary].clone();

        for (field, resolution) in &self.resolutions {
            let value = match resolution {
                FieldResolution::Candidate { entity_id } => {
                    let index = self.index_of(entity_id)?;
                    self.snapshots[index].get(field).cloned()
                }
                FieldResolution::Custom { value } => Some(value.clone()),
            };
            if let Some(value) = value {
                fields.insert(field.clone(), value);
            }
        }

        fields.insert("kind".to_string(), serde_json::to_value(self.kind())?);
        let entity: Entity = serde_json::from_value(Value::Object(fields))?;
        Ok(IdentifiedEntity::new(self.primary().id.clone(), entity))
    }

    /// Finish the merge: the merged record plus the ids of every non-primary member.
    pub fn apply(self) -> Result<MergeOutcome, MergeError> {
        let merged = self.merged()?;
        let removable_ids: Vec<String> = self
            .members
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.primary)
            .map(|(_, m)| m.id.clone())
            .collect();

        info!(
            primary = %merged.id,
            removed = removable_ids.len(),
            resolved_fields = self.resolutions.len(),
            "Merge applied"
        );

        Ok(MergeOutcome {
            merged,
            removable_ids,
        })
    }

    /// Abandon the merge and hand the untouched members back
    pub fn cancel(self) -> Vec<IdentifiedEntity> {
        debug!(primary = %self.primary().id, "Merge cancelled");
        self.members
    }

    fn index_of(&self, entity_id: &str) -> Result<usize, MergeError> {
        self.members
            .iter()
            .position(|m| m.id == entity_id)
            .ok_or_else(|| MergeError::UnknownEntity {
                id: entity_id.to_string(),
            })
    }

    fn exposed_spec(&self, field: &str) -> Result<FieldSpec, MergeError> {
        let not_exposed = || MergeError::FieldNotExposed {
            field: field.to_string(),
        };
        let spec = field_spec(self.kind(), field).ok_or_else(not_exposed)?;
        if self.exposed_fields().iter().any(|f| f.spec.name == spec.name) {
            Ok(spec)
        } else {
            Err(not_exposed())
        }
    }

    fn select_for(&mut self, spec: FieldSpec, entity_id: &str) -> Result<(), MergeError> {
        let index = self.index_of(entity_id)?;
        if !self.snapshots[index].get(spec.name).is_some_and(is_present) {
            return Err(MergeError::NoCandidateValue {
                field: spec.name.to_string(),
                id: entity_id.to_string(),
            });
        }

        self.resolutions.insert(
            spec.name.to_string(),
            FieldResolution::Candidate {
                entity_id: entity_id.to_string(),
            },
        );
        self.stage = MergeStage::EditingFields;
        debug!(field = spec.name, source = %entity_id, "Field resolved to candidate");
        Ok(())
    }
}

fn snapshot(entity: &Entity) -> Result<Map<String, Value>, MergeError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// Editing handle for one exposed field, typed by whether custom values are allowed.
pub enum FieldEditor<'a> {
    Choice(ChoiceEditor<'a>),
    FreeForm(FreeFormEditor<'a>),
}

impl FieldEditor<'_> {
    pub fn spec(&self) -> FieldSpec {
        match self {
            FieldEditor::Choice(e) => e.spec,
            FieldEditor::FreeForm(e) => e.spec,
        }
    }

    pub fn select(&mut self, entity_id: &str) -> Result<(), MergeError> {
        match self {
            FieldEditor::Choice(e) => e.select(entity_id),
            FieldEditor::FreeForm(e) => e.select(entity_id),
        }
    }
}

/// Enumerated field: only existing member values can be picked.
pub struct ChoiceEditor<'a> {
    session: &'a mut MergeSession,
    spec: FieldSpec,
}

impl ChoiceEditor<'_> {
    pub fn candidates(&self) -> Vec<FieldCandidate> {
        self.session.candidates(self.spec.name)
    }

    pub fn select(&mut self, entity_id: &str) -> Result<(), MergeError> {
        self.session.select_for(self.spec, entity_id)
    }
}

pub struct FreeFormEditor<'a> {
    session: &'a mut MergeSession,
    spec: FieldSpec,
}

impl FreeFormEditor<'_> {
    pub fn candidates(&self) -> Vec<FieldCandidate> {
        self.session.candidates(self.spec.name)
    }

    pub fn select(&mut self, entity_id: &str) -> Result<(), MergeError> {
        self.session.select_for(self.spec, entity_id)
    }

    /// Switch the field to a typed-in value, parsed per the field's type
    pub fn set_custom_value(&mut self, raw: &str) -> Result<(), MergeError> {
        let value = self.spec.field_type.parse_custom(self.spec.name, raw)?;
        self.session.resolutions.insert(
            self.spec.name.to_string(),
            FieldResolution::Custom { value },
        );
        self.session.stage = MergeStage::EditingFields;
        debug!(field = self.spec.name, "Field resolved to custom value");
        Ok(())
    }
}

/// Merge a group without interaction: the first member survives and every exposed
/// field keeps the primary's value, or the first candidate's when the primary has none.
pub fn auto_merge(members: &[IdentifiedEntity]) -> Result<MergeOutcome, MergeError> {
    let mut session = MergeSession::begin(members)?;
    let primary_id = session.primary().id.clone();

    for field in session.exposed_fields() {
        let source = field
            .candidates
            .iter()
            .find(|c| c.entity_id == primary_id)
            .or_else(|| field.candidates.first())
            .map(|c| c.entity_id.clone());
        if let Some(source) = source {
            session.select_candidate(field.spec.name, &source)?;
        }
    }

    session.apply()
}
