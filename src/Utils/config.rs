//! Server configuration from an optional TOML file:
//! ```toml
//! host = "127.0.0.1"
//! port = 8080
//! log_level = "debug"
//! ```
//! Every key is optional, a missing file means defaults.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::server::ServerError;

pub const DEFAULT_CONFIG_PATH: &str = "solver.toml";

/// where the loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Defaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// debug, info, warn or error
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> Result<ServerConfig, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads `path`; a file that does not exist gives the defaults, a malformed one is an error.
    /// Runs before the logger exists, so the caller reports the [`ConfigSource`].
    pub fn load_or_default(path: &Path) -> Result<(ServerConfig, ConfigSource), ServerError> {
        if !path.exists() {
            return Ok((ServerConfig::default(), ConfigSource::Defaults));
        }
        let text = fs::read_to_string(path)?;
        let config = ServerConfig::from_toml_str(&text).map_err(|source| ServerError::Config {
            path: path.display().to_string(),
            source,
        })?;
        Ok((config, ConfigSource::File))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "0.0.0.0:5000");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ServerConfig::from_toml_str("port = 8080").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "host = \"127.0.0.1\"\nport = 6000\nlog_level = \"debug\"").unwrap();
        let (config, source) = ServerConfig::load_or_default(file.path()).unwrap();
        assert_eq!(source, ConfigSource::File);
        assert_eq!(
            config,
            ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 6000,
                log_level: "debug".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) =
            ServerConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(source, ConfigSource::Defaults);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        let err = ServerConfig::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, ServerError::Config { .. }), "{:?}", err);
    }
}
