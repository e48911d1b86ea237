//! Parse configuration with TOML, environment variable, and default sources.

use std::path::Path;
use std::{env, fs};

use ggufmeta_reader::{CHUNK_SIZE, ReaderOptions};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ── Errors ──────────────────────────────────────────────────────────

/// Errors produced by configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid environment variable value for {key}: {value}")]
    InvalidEnvVar { key: String, value: String },
}

pub const ENV_CHUNK_SIZE: &str = "GGUFMETA_CHUNK_SIZE";
pub const ENV_ALLOW_PARTIAL_CHUNK: &str = "GGUFMETA_ALLOW_PARTIAL_CHUNK";

// ── TOML wrapper ────────────────────────────────────────────────────

/// Wrapper used for the `[parse]` table in TOML files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlWrapper {
    parse: ParseConfig,
}

// ── ParseConfig ─────────────────────────────────────────────────────

/// How a metadata header is read from its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Bytes fetched per chunk.
    pub chunk_size: usize,
    /// Treat a short chunk as end-of-file instead of a truncated read, so
    /// sources smaller than one chunk can be parsed.
    pub allow_partial_chunk: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self { chunk_size: CHUNK_SIZE, allow_partial_chunk: false }
    }
}

impl ParseConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// The file is expected to contain a `[parse]` table. If the file does
    /// not exist, returns `Ok(Self::default())`.
    pub fn from_toml(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(path = %path.display(), "config file not found; using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let wrapper: TomlWrapper = toml::from_str(&text)?;
        Ok(wrapper.parse)
    }

    /// Serialize to a TOML string (wrapped in `[parse]`).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let wrapper = TomlWrapper { parse: self.clone() };
        Ok(toml::to_string_pretty(&wrapper)?)
    }

    /// Build a config from `GGUFMETA_*` environment variables on top of
    /// [`Self::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Ok(v) = env::var(ENV_CHUNK_SIZE) {
            cfg.chunk_size = Self::parse_env_usize(ENV_CHUNK_SIZE, &v)?;
        }
        if let Ok(v) = env::var(ENV_ALLOW_PARTIAL_CHUNK) {
            cfg.allow_partial_chunk = Self::parse_env_bool(ENV_ALLOW_PARTIAL_CHUNK, &v)?;
        }

        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Validation("chunk_size must be >= 1".into()));
        }
        Ok(())
    }

    /// Overlay `other` on top of `self`. Fields in `other` that differ from
    /// the default take precedence.
    #[must_use]
    pub fn merge_with(&self, other: &Self) -> Self {
        let d = Self::default();
        Self {
            chunk_size: if other.chunk_size == d.chunk_size {
                self.chunk_size
            } else {
                other.chunk_size
            },
            allow_partial_chunk: if other.allow_partial_chunk == d.allow_partial_chunk {
                self.allow_partial_chunk
            } else {
                other.allow_partial_chunk
            },
        }
    }

    /// Options handed to the byte-level reader.
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions { chunk_size: self.chunk_size, allow_partial_chunk: self.allow_partial_chunk }
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn parse_env_usize(key: &str, val: &str) -> Result<usize, ConfigError> {
        val.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvVar {
            key: key.to_string(),
            value: val.to_string(),
        })
    }

    fn parse_env_bool(key: &str, val: &str) -> Result<bool, ConfigError> {
        match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidEnvVar { key: key.to_string(), value: val.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_is_valid_and_matches_reader_defaults() {
        let cfg = ParseConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.reader_options(), ReaderOptions::default());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let cfg = ParseConfig { chunk_size: 0, ..Default::default() };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn toml_round_trip() {
        let cfg = ParseConfig { chunk_size: 4096, allow_partial_chunk: true };
        let text = cfg.to_toml().unwrap();
        assert!(text.contains("[parse]"));
        let back: TomlWrapper = toml::from_str(&text).unwrap();
        assert_eq!(back.parse, cfg);
    }

    #[test]
    fn from_toml_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ggufmeta.toml");
        fs::write(&path, "[parse]\nallow_partial_chunk = true\n").unwrap();
        let cfg = ParseConfig::from_toml(&path).unwrap();
        assert_eq!(cfg, ParseConfig { chunk_size: CHUNK_SIZE, allow_partial_chunk: true });
    }

    #[test]
    fn from_toml_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ParseConfig::from_toml(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, ParseConfig::default());
    }

    #[test]
    fn from_toml_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[parse]\nchunk_size = \"big\"\n").unwrap();
        assert!(matches!(ParseConfig::from_toml(&path), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn merge_prefers_non_default_overrides() {
        let base = ParseConfig { chunk_size: 1024, allow_partial_chunk: false };
        let over = ParseConfig { chunk_size: CHUNK_SIZE, allow_partial_chunk: true };
        let merged = base.merge_with(&over);
        assert_eq!(merged, ParseConfig { chunk_size: 1024, allow_partial_chunk: true });
    }

    #[test]
    #[serial(ggufmeta_env)]
    fn from_env_reads_overrides() {
        temp_env::with_vars(
            [(ENV_CHUNK_SIZE, Some("65536")), (ENV_ALLOW_PARTIAL_CHUNK, Some("yes"))],
            || {
                let cfg = ParseConfig::from_env().unwrap();
                assert_eq!(cfg.chunk_size, 65536);
                assert!(cfg.allow_partial_chunk);
            },
        );
    }

    #[test]
    #[serial(ggufmeta_env)]
    fn from_env_without_vars_is_default() {
        temp_env::with_vars_unset([ENV_CHUNK_SIZE, ENV_ALLOW_PARTIAL_CHUNK], || {
            assert_eq!(ParseConfig::from_env().unwrap(), ParseConfig::default());
        });
    }

    #[test]
    #[serial(ggufmeta_env)]
    fn from_env_rejects_garbage() {
        temp_env::with_var(ENV_CHUNK_SIZE, Some("ten megs"), || {
            let err = ParseConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnvVar { ref key, .. } if key == ENV_CHUNK_SIZE));
        });
        temp_env::with_var(ENV_ALLOW_PARTIAL_CHUNK, Some("maybe"), || {
            assert!(ParseConfig::from_env().is_err());
        });
    }
}
