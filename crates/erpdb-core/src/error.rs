//! Runtime error shared by every core subsystem.
//!
//! Subsystems raise their own `thiserror` enums and convert into
//! `InternalError` at the `Db` boundary; the facade maps it onto its public
//! error kinds.

use derive_more::Display;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// What went wrong (`class`), where (`origin`), and a readable message.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    pub(crate) fn store_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Store, message)
    }

    pub(crate) fn store_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Store, message)
    }

    /// Stored data that no longer decodes into its entity type.
    pub(crate) fn serialize_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Serialize, message)
    }

    pub(crate) fn serialize_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Serialize, message)
    }

    /// The collection has no registered schema.
    pub fn unknown_collection(collection: impl AsRef<str>) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Schema,
            format!("no schema registered for collection '{}'", collection.as_ref()),
        )
    }

    /// `origin:class: message`, for log lines.
    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorClass {
    #[display("corruption")]
    Corruption,

    #[display("not_found")]
    NotFound,

    #[display("internal")]
    Internal,

    #[display("unsupported")]
    Unsupported,

    #[display("invariant_violation")]
    InvariantViolation,

    #[display("validation")]
    Validation,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorOrigin {
    #[display("serialize")]
    Serialize,

    #[display("store")]
    Store,

    #[display("query")]
    Query,

    #[display("persist")]
    Persist,

    #[display("schema")]
    Schema,

    #[display("config")]
    Config,

    #[display("interface")]
    Interface,
}

///
/// TESTS
///
