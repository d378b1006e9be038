use thiserror::Error;

/// Caller-visible merge failures. Extraction never errors; only merging does.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("at least 2 entities are required to merge (got {count})")]
    InsufficientEntities { count: usize },

    #[error("entity '{id}' is not part of this merge")]
    UnknownEntity { id: String },

    #[error("field '{field}' is not open for resolution")]
    FieldNotExposed { field: String },

    #[error("entity '{id}' has no value for field '{field}'")]
    NoCandidateValue { field: String, id: String },

    #[error("custom value for field '{field}' is empty")]
    EmptyCustomValue { field: String },

    #[error("custom value '{value}' is not valid for field '{field}': {reason}")]
    InvalidCustomValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("entity could not be converted: {0}")]
    Serialization(#[from] serde_json::Error),
}
