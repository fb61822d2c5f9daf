use clap::ValueEnum;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{ListingError, Result};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    File,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub api_base: String,
    /// Falls back to `OPENAI_API_KEY` when unset.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub storage: StorageKind,
    pub data_dir: String,
    pub save_exchanges: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            api_base: "https://api.openai.com/v1".into(),
            api_key: None,
            timeout_secs: 120,
            temperature: 0.7,
            storage: StorageKind::File,
            data_dir: ".listing".into(),
            save_exchanges: false,
        }
    }
}

impl Config {
    /// Reads a TOML or YAML config file, picked by extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ListingError::Config(e.to_string()))?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        match ext {
            "yaml" | "yml" => serde_yaml::from_str(&raw)
                .map_err(|e| ListingError::Config(format!("{}: {e}", path.display()))),
            _ => toml::from_str(&raw)
                .map_err(|e| ListingError::Config(format!("{}: {e}", path.display()))),
        }
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ListingError::Config(format!("{API_KEY_ENV} env var is not set")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn toml_overrides_defaults() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(f, "model = \"gpt-4o\"\nstorage = \"sqlite\"\ntimeout_secs = 30").unwrap();
        let cfg = Config::from_file(f.path()).unwrap();
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.storage, StorageKind::Sqlite);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.data_dir, ".listing");
    }

    #[test]
    fn yaml_is_selected_by_extension() {
        let mut f = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(f, "temperature: 0.2\ndata_dir: /tmp/listing").unwrap();
        let cfg = Config::from_file(f.path()).unwrap();
        assert_eq!(cfg.temperature, 0.2);
        assert_eq!(cfg.data_dir, "/tmp/listing");
    }

    #[test]
    fn explicit_api_key_wins() {
        let cfg = Config { api_key: Some("from-file".into()), ..Config::default() };
        assert_eq!(cfg.api_key().unwrap(), "from-file");
    }

    #[test]
    fn malformed_file_is_config_error() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(f, "model = [").unwrap();
        assert!(matches!(Config::from_file(f.path()), Err(ListingError::Config(_))));
    }
}
