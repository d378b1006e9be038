pub mod content;
pub mod reader;
pub mod sections;

pub use content::{Heading, SourceContent};
pub use reader::FileReader;
pub use sections::{StructureParser, section_text, sentences};

use anyhow::Result;
use std::path::Path;

/// Main ingestion entry point for a single session document
pub async fn ingest_file(file_path: &Path) -> Result<SourceContent> {
    FileReader::read_file(file_path).await
}

/// Ingest an entire directory of session documents
pub async fn ingest_directory(dir_path: &Path) -> Result<Vec<SourceContent>> {
    FileReader::read_directory(dir_path).await
}

/// Ingest either a single file or a directory
pub async fn ingest_path(path: &Path) -> Result<Vec<SourceContent>> {
    if path.is_dir() {
        ingest_directory(path).await
    } else {
        Ok(vec![ingest_file(path).await?])
    }
}
