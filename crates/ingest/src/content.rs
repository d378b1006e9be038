use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A heading found in the converted document, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Structural view of one converted session document.
///
/// `raw_text` keeps the source verbatim (markup included), `plain_text` is what the
/// extractors scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContent {
    pub doc_id: String,
    pub filename: String,
    pub raw_text: String,
    pub plain_text: String,
    pub headings: Vec<Heading>,
}

impl SourceContent {
    pub fn new(
        filename: impl Into<String>,
        raw_text: String,
        plain_text: String,
        headings: Vec<Heading>,
    ) -> Self {
        let filename = filename.into();
        // Stable id from name + content so re-reading the same file gives the same id
        let doc_id = Self::generate_doc_id(&filename, &raw_text);

        Self {
            doc_id,
            filename,
            raw_text,
            plain_text,
            headings,
        }
    }

    /// Build content from text that has no markup: plain and raw text are identical.
    pub fn from_plain(filename: impl Into<String>, text: &str, headings: Vec<Heading>) -> Self {
        Self::new(filename, text.to_string(), text.to_string(), headings)
    }

    fn generate_doc_id(filename: &str, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(filename.as_bytes());
        hasher.update(text.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16]) // Use first 16 bytes (32 hex chars)
    }

    /// Rough word count of the plain text
    pub fn word_count(&self) -> usize {
        self.plain_text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_is_stable() {
        let a = SourceContent::from_plain("session-1.md", "Durnan nodded.", vec![]);
        let b = SourceContent::from_plain("session-1.md", "Durnan nodded.", vec![]);
        let c = SourceContent::from_plain("session-2.md", "Durnan nodded.", vec![]);

        assert_eq!(a.doc_id, b.doc_id);
        assert_ne!(a.doc_id, c.doc_id);
        assert_eq!(a.doc_id.len(), 32);
    }
}
