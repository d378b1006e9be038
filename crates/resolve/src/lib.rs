//! Identity resolution over extracted entities: duplicate grouping by kind and
//! normalized title, and the field-by-field merge of a duplicate group.

pub mod duplicates;
pub mod error;
pub mod fields;
pub mod merge;

pub use duplicates::{DuplicateGroup, DuplicateReport, find_duplicate_groups, group_by_key};
pub use error::MergeError;
pub use fields::{FieldSpec, FieldType, field_spec, fields_for};
pub use merge::{
    ChoiceEditor, ExposedField, FieldCandidate, FieldEditor, FieldResolution, FreeFormEditor,
    MergeOutcome, MergeSession, MergeStage, auto_merge,
};
