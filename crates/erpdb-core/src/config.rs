//! Runtime configuration for a `Db` instance.

use crate::{
    db::query::PageLimits,
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error as ThisError;

/// Key under which the whole store is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "erp_data";

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("storage_key must not be empty")]
    EmptyStorageKey,

    #[error("{field} must be greater than zero")]
    ZeroPageSize { field: &'static str },

    #[error("default_page_size ({default}) exceeds max_page_size ({max})")]
    DefaultAboveMax { default: u32, max: u32 },
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Validation, ErrorOrigin::Config, err.to_string())
    }
}

///
/// DbConfig
///
/// Every field has a default, so an empty TOML document is a valid config.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    pub storage_key: String,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl DbConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::ZeroPageSize {
                field: "default_page_size",
            });
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::ZeroPageSize {
                field: "max_page_size",
            });
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::DefaultAboveMax {
                default: self.default_page_size,
                max: self.max_page_size,
            });
        }

        Ok(())
    }

    #[must_use]
    pub const fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

///
/// TESTS
///
