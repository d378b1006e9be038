use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

use crate::content::SourceContent;
use crate::sections::StructureParser;

pub struct FileReader;

impl FileReader {
    fn is_supported(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("txt" | "md" | "markdown")
        )
    }

    pub async fn read_file(path: &Path) -> Result<SourceContent> {
        if !Self::is_supported(path) {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            anyhow::bail!("Unsupported file format: {}", extension);
        }

        let raw = fs::read_to_string(path)
            .await
            .context(format!("Failed to read file: {:?}", path))?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let content = StructureParser::default().parse(&filename, &raw);
        debug!(
            file = %filename,
            headings = content.headings.len(),
            words = content.word_count(),
            "Read session document"
        );
        Ok(content)
    }

    /// Read every supported file below `dir`, sorted by path so batch order is stable
    pub async fn read_directory(dir: &Path) -> Result<Vec<SourceContent>> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.context(format!("Failed to walk directory: {:?}", dir))?;
            let path = entry.path();
            if path.is_file() && Self::is_supported(path) {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(Self::read_file(&path).await?);
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_file_parses_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session-4.md");
        std::fs::write(&path, "# Session Four\nDurnan waited.\n").unwrap();

        let content = FileReader::read_file(&path).await.unwrap();
        assert_eq!(content.filename, "session-4.md");
        assert_eq!(content.headings.len(), 1);
        assert!(content.plain_text.contains("Durnan waited."));
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.docx");
        std::fs::write(&path, "binary").unwrap();

        assert!(FileReader::read_file(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_read_directory_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("arc")).unwrap();
        std::fs::write(dir.path().join("b.md"), "B").unwrap();
        std::fs::write(dir.path().join("a.txt"), "A").unwrap();
        std::fs::write(dir.path().join("arc").join("c.md"), "C").unwrap();
        std::fs::write(dir.path().join("image.png"), "x").unwrap();

        let files = FileReader::read_directory(dir.path()).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "c.md", "b.md"]);
    }
}
