//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables (`QR3K_*`)
//! - CLI arguments
//!
//! Every field defaults to the constants shared with the browser runtime, so
//! an empty config reproduces the canonical encoder.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::accounting::Limits;
use crate::codec::{CipherKey, CompressionLevel, DEFAULT_KEY};
use crate::error::{Qr3kError, Result};
use crate::links::LinkBuilder;

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Capacity budget
    #[serde(default)]
    pub limits: Limits,

    /// Compression configuration
    #[serde(default)]
    pub compression: CompressionConfig,

    /// Link endpoints
    #[serde(default)]
    pub links: LinkBuilder,

    /// Cipher configuration
    #[serde(default)]
    pub cipher: CipherConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Qr3kError::Config(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file location (`<config dir>/qr3k/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("qr3k").join("config.toml"))
    }

    /// Load the default config file if present, then apply the environment
    pub fn load() -> Result<Self> {
        let base = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        Ok(base.merge(Self::from_env()?))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("QR3K_LEVEL") {
            let level: u32 = level
                .parse()
                .map_err(|_| Qr3kError::Config(format!("QR3K_LEVEL is not a number: {level}")))?;
            config.compression.level = CompressionLevel::new(level)
                .map_err(|e| Qr3kError::Config(e.to_string()))?;
        }
        if let Ok(url) = std::env::var("QR3K_GAME_BASE_URL") {
            config.links.game_base_url = url;
        }
        if let Ok(url) = std::env::var("QR3K_QR_BASE_URL") {
            config.links.qr_base_url = url;
        }
        if let Ok(key) = std::env::var("QR3K_KEY") {
            config.cipher.key = key;
        }

        Ok(config)
    }

    /// Merge with another config (other takes precedence where it differs from defaults)
    pub fn merge(self, other: Self) -> Self {
        let defaults = Self::default();
        Self {
            limits: if other.limits != defaults.limits {
                other.limits
            } else {
                self.limits
            },
            compression: if other.compression != defaults.compression {
                other.compression
            } else {
                self.compression
            },
            links: LinkBuilder {
                game_base_url: if other.links.game_base_url != defaults.links.game_base_url {
                    other.links.game_base_url
                } else {
                    self.links.game_base_url
                },
                qr_base_url: if other.links.qr_base_url != defaults.links.qr_base_url {
                    other.links.qr_base_url
                } else {
                    self.links.qr_base_url
                },
            },
            cipher: if other.cipher != defaults.cipher {
                other.cipher
            } else {
                self.cipher
            },
        }
    }

    /// Check limits and key
    pub fn validate(&self) -> Result<()> {
        self.limits.validate()?;
        self.cipher.key()?;
        Ok(())
    }
}

/// Compression configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Gzip level (1-9)
    #[serde(default)]
    pub level: CompressionLevel,
}

/// Cipher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherConfig {
    /// XOR key; must match the runtime page that decodes the games
    pub key: String,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            key: String::from_utf8_lossy(DEFAULT_KEY).into_owned(),
        }
    }
}

impl CipherConfig {
    /// Key as a validated [`CipherKey`]
    pub fn key(&self) -> Result<CipherKey> {
        CipherKey::new(self.key.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.limits.capacity, 2953);
        assert_eq!(config.compression.level, CompressionLevel::DEFAULT);
        assert_eq!(config.cipher.key, "qr3k");
        assert_eq!(config.links, LinkBuilder::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [limits]
            capacity = 2331
            overhead = 200

            [compression]
            level = 9

            [links]
            game_base_url = "https://games.test/"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.limits.capacity, 2331);
        assert_eq!(config.limits.overhead, 200);
        assert_eq!(config.limits.soft_limit, 2200);
        assert_eq!(config.compression.level, CompressionLevel::MAX);
        assert_eq!(config.links.game_base_url, "https://games.test/");
        assert_eq!(config.links.qr_base_url, crate::links::DEFAULT_QR_BASE_URL);
        assert_eq!(config.cipher.key, "qr3k");
    }

    #[test]
    fn test_config_rejects_bad_level() {
        let result: std::result::Result<Config, _> = toml::from_str("[compression]\nlevel = 11\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cipher]\nkey = \"abc\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.cipher.key().unwrap().as_bytes(), b"abc");
    }

    #[test]
    fn test_from_file_rejects_empty_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cipher]\nkey = \"\"").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(Qr3kError::InvalidKey)
        ));
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[compression]\nlevel = 12").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Qr3kError::Config(_)));
        assert!(err.to_string().contains("compression level 12"));
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            Config::from_file("/nonexistent/qr3k.toml"),
            Err(Qr3kError::Config(_))
        ));
    }

    #[test]
    fn test_merge_prefers_non_default() {
        let mut file_config = Config::default();
        file_config.compression.level = CompressionLevel::MIN;
        file_config.links.qr_base_url = "https://qr.test/img".to_string();

        let mut env_config = Config::default();
        env_config.links.game_base_url = "https://env.test/".to_string();

        let merged = file_config.merge(env_config);
        assert_eq!(merged.compression.level, CompressionLevel::MIN);
        assert_eq!(merged.links.qr_base_url, "https://qr.test/img");
        assert_eq!(merged.links.game_base_url, "https://env.test/");
    }
}
