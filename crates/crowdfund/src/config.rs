//! Program configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use crowdfund_core::Address;
use serde::{Deserialize, Serialize};

/// Configuration for the Program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    /// Identity of this program. Part of every derived address and the
    /// owner of every record it creates.
    pub program_id: Address,
    /// SQLite database file. `None` keeps records in memory.
    pub database_path: Option<PathBuf>,
    /// Whether to verify instruction signatures in `process`.
    pub verify_signatures: bool,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            program_id: Address::from_bytes(*blake3::hash(b"crowdfund-program-v0").as_bytes()),
            database_path: None,
            verify_signatures: true,
        }
    }
}

impl ProgramConfig {
    /// Default configuration with a specific program id.
    pub fn with_program_id(program_id: Address) -> Self {
        Self {
            program_id,
            ..Self::default()
        }
    }

    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stable() {
        assert_eq!(ProgramConfig::default(), ProgramConfig::default());
        assert!(ProgramConfig::default().verify_signatures);
        assert!(ProgramConfig::default().database_path.is_none());
    }

    #[test]
    fn test_from_json_partial() {
        let config = ProgramConfig::from_json(r#"{"verify_signatures": false}"#).unwrap();
        assert!(!config.verify_signatures);
        assert_eq!(config.program_id, ProgramConfig::default().program_id);
    }

    #[test]
    fn test_from_json_full() {
        let id = Address::from_bytes([0x42; 32]);
        let json = format!(
            r#"{{"program_id": "{}", "database_path": "/tmp/cf.db", "verify_signatures": true}}"#,
            id.to_hex()
        );
        let config = ProgramConfig::from_json(&json).unwrap();
        assert_eq!(config.program_id, id);
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/cf.db")));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProgramConfig::load("/nonexistent/crowdfund.json").unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"verify_signatures": false}"#).unwrap();

        let config = ProgramConfig::load(&path).unwrap();
        assert!(!config.verify_signatures);
    }
}
