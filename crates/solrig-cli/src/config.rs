//! CLI configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::CliError;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Trace artifact output path
    #[serde(default = "default_traces_out")]
    pub traces_out: PathBuf,
    /// Status artifact output path
    #[serde(default = "default_statuses_out")]
    pub statuses_out: PathBuf,
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_traces_out() -> PathBuf {
    PathBuf::from("debugs.json")
}

fn default_statuses_out() -> PathBuf {
    PathBuf::from("returnvals.txt")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            traces_out: default_traces_out(),
            statuses_out: default_statuses_out(),
        }
    }
}

impl Config {
    /// Default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".solrig").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist and parse; the default path is read only
    /// when it is present.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&text).map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.traces_out, PathBuf::from("debugs.json"));
        assert_eq!(config.statuses_out, PathBuf::from("returnvals.txt"));
    }

    #[test]
    fn test_config_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"rpc_url = \"http://localhost:7545\"\n").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:7545");
        assert_eq!(config.traces_out, PathBuf::from("debugs.json"));
    }

    #[test]
    fn test_config_missing_explicit_path_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/config.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"rpc_url = [not toml").unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }
}
