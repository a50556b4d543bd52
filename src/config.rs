use crate::config_discovery::find_config_file;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Invalid config format: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A selectable toolbar value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Preset {
    pub value: String,
    pub label: String,
}

impl Preset {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorConfig {
    pub font_sizes: Vec<Preset>,
    pub font_families: Vec<Preset>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_sizes: vec![
                Preset::new("12px", "Small"),
                Preset::new("16px", "Normal"),
                Preset::new("20px", "Large"),
                Preset::new("24px", "Huge"),
            ],
            font_families: vec![
                Preset::new("Arial, sans-serif", "Arial"),
                Preset::new("Calibri, sans-serif", "Calibri"),
                Preset::new("Georgia, serif", "Georgia"),
                Preset::new("Times New Roman, serif", "Times New Roman"),
                Preset::new("Verdana, sans-serif", "Verdana"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the task API; tasks are created with `POST {base_url}/tasks`.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn tasks_endpoint(&self) -> String {
        format!("{}/tasks", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TaskdeskConfig {
    pub api: ApiConfig,
    pub editor: EditorConfig,
}

impl TaskdeskConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `explicit` if given, else the discovered config file, else
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(),
        };
        match path {
            Some(path) => {
                debug!("loading config from {}", path.display());
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_toolbar_presets() {
        let config = TaskdeskConfig::default();
        assert_eq!(config.editor.font_sizes.len(), 4);
        assert_eq!(config.editor.font_sizes[2], Preset::new("20px", "Large"));
        assert_eq!(config.editor.font_families[0].value, "Arial, sans-serif");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TaskdeskConfig::from_toml(
            r#"
            [api]
            base_url = "https://tasks.example.com/api/"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.tasks_endpoint(), "https://tasks.example.com/api/tasks");
        assert_eq!(config.editor, EditorConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [editor]
            font_sizes = [{ value = "10px", label = "Tiny" }]
            "#,
        )
        .unwrap();

        let config = TaskdeskConfig::load(Some(&path)).unwrap();
        assert_eq!(config.editor.font_sizes, vec![Preset::new("10px", "Tiny")]);
        assert_eq!(config.editor.font_families.len(), 5);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[editor\nfont_sizes = 3").unwrap();
        assert!(matches!(
            TaskdeskConfig::load(Some(&path)),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            TaskdeskConfig::from_file(&temp_dir.path().join("missing.toml")),
            Err(ConfigError::Read(_))
        ));
    }
}
