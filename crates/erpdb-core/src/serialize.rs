//! JSON text codec shared by persistence, export, and seed loading.
//! Applies no store policy; callers decide what a decoded value means.

use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("could not encode JSON: {0}")]
    Encode(serde_json::Error),

    #[error("could not decode JSON: {0}")]
    Decode(serde_json::Error),
}

impl SerializeError {
    /// Encoding failures mean a bug on our side; decoding failures mean bad input.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// 1-based line and column of a decode failure.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::Decode(err) => Some((err.line(), err.column())),
            Self::Encode(_) => None,
        }
    }
}

impl From<SerializeError> for InternalError {
    fn from(err: SerializeError) -> Self {
        let class = if err.is_decode() {
            ErrorClass::Corruption
        } else {
            ErrorClass::Internal
        };

        Self::new(class, ErrorOrigin::Serialize, err.to_string())
    }
}

/// Compact JSON.
pub fn serialize<T>(value: &T) -> Result<String, SerializeError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(SerializeError::Encode)
}

/// JSON indented by two spaces, for human-facing exports.
pub fn serialize_pretty<T>(value: &T) -> Result<String, SerializeError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string_pretty(value).map_err(SerializeError::Encode)
}

pub fn deserialize<T>(text: &str) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(text).map_err(SerializeError::Decode)
}

///
/// TESTS
///
