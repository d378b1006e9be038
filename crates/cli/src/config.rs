use anyhow::{Context, Result};
use extract::{ExtractionConfig, TermDictionary};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub merge: MergeMode,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    pub extraction: ExtractionConfig,
    /// JSON term dictionary replacing the built-in vocabulary
    pub dictionary_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    Report, // List duplicate groups and their conflicting fields
    Auto,   // Merge every group, first member wins
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive used when `LOREKEEP_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
    pub include_entities: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            include_entities: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            merge: MergeMode::Report,
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
            extraction: ExtractionConfig::default(),
            dictionary_path: None,
        }
    }
}

impl AppConfig {
    pub fn report_mode() -> Self {
        Self::default()
    }

    /// Unattended batch runs: merge everything, log JSON, compact output
    pub fn auto_mode() -> Self {
        Self {
            merge: MergeMode::Auto,
            logging: LoggingConfig {
                format: LogFormat::Json,
                filter: "warn".to_string(),
            },
            output: OutputConfig {
                pretty: false,
                ..OutputConfig::default()
            },
            ..Self::default()
        }
    }

    /// Read a JSON config file; missing keys keep their defaults
    pub async fn from_file(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    pub async fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path).await,
            None => Ok(Self::default()),
        }
    }

    /// The term dictionary named by `dictionary_path`, or the built-in one
    pub async fn dictionary(&self) -> Result<TermDictionary> {
        let Some(path) = &self.dictionary_path else {
            return Ok(TermDictionary::default());
        };
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read dictionary {}", path.display()))?;
        TermDictionary::from_json(&json)
            .with_context(|| format!("Invalid dictionary {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"merge": "auto", "extraction": {{"synopsis_max_chars": 120}}}}"#).unwrap();

        let config = AppConfig::load(Some(file.path())).await.unwrap();
        assert_eq!(config.merge, MergeMode::Auto);
        assert_eq!(config.extraction.synopsis_max_chars, 120);
        assert_eq!(config.extraction.npc_gate.max_len, 25);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.dictionary_path.is_none());
    }

    #[tokio::test]
    async fn test_partial_nested_sections() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"extraction": {{"npc_gate": {{"max_len": 30}}}}}}"#).unwrap();
        let config = AppConfig::load(Some(file.path())).await.unwrap();
        assert_eq!(config.extraction.npc_gate.max_len, 30);
        assert_eq!(config.extraction.npc_gate.min_len, 3);
        assert_eq!(config.extraction.npc_gate.max_words, 4);
        assert_eq!(config.extraction.location_gate.max_len, 40);

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"output": {{"pretty": false}}, "logging": {{"filter": "debug"}}}}"#).unwrap();
        let config = AppConfig::load(Some(file.path())).await.unwrap();
        assert!(!config.output.pretty);
        assert!(config.output.include_entities);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[tokio::test]
    async fn test_dictionary_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"npc_names": ["Zelda Zunn"]}}"#).unwrap();
        let config = AppConfig {
            dictionary_path: Some(file.path().to_path_buf()),
            ..AppConfig::default()
        };

        let dictionary = config.dictionary().await.unwrap();
        assert_eq!(dictionary.npc_names, vec!["Zelda Zunn".to_string()]);
        assert!(!dictionary.quest_verbs.is_empty());

        let missing = AppConfig {
            dictionary_path: Some(PathBuf::from("/nonexistent/terms.json")),
            ..AppConfig::default()
        };
        let err = missing.dictionary().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read dictionary"));
    }

    #[tokio::test]
    async fn test_missing_config_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/lorekeep.json")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_presets() {
        assert_eq!(AppConfig::report_mode().merge, MergeMode::Report);
        let auto = AppConfig::auto_mode();
        assert_eq!(auto.merge, MergeMode::Auto);
        assert_eq!(auto.logging.format, LogFormat::Json);
        assert!(!auto.output.pretty);
    }
}
