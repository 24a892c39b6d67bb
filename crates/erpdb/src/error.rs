use derive_more::Display;
use erpdb_core::{
    db::{persist::PersistError, query::QueryError},
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
    types::RecordId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// For callers that need a record to exist. The store itself never
    /// raises this; lookups return `Option`.
    pub fn not_found(collection: &str, id: &RecordId) -> Self {
        Self::new(
            ErrorKind::NotFound,
            ErrorOrigin::Store,
            format!("record {id} not found in '{collection}'"),
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match (err.class, err.origin) {
            (ErrorClass::Validation, CoreErrorOrigin::Query) => {
                ErrorKind::Query(QueryErrorKind::Invalid)
            }
            (ErrorClass::Validation, _) => ErrorKind::Validation,
            (ErrorClass::Unsupported, _) => ErrorKind::Query(QueryErrorKind::Unsupported),
            (ErrorClass::NotFound, _) => ErrorKind::NotFound,
            (ErrorClass::Corruption, _) => ErrorKind::Store(StoreErrorKind::Corruption),
            (ErrorClass::InvariantViolation, _) => {
                ErrorKind::Store(StoreErrorKind::Conflict)
            }
            (ErrorClass::Internal, _) => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<PersistError> for Error {
    fn from(err: PersistError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers and service boundaries.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Query(QueryErrorKind),

    /// Create fields failed schema validation.
    Validation,

    /// A caller asked for a record that must exist.
    NotFound,

    Store(StoreErrorKind),

    /// The caller cannot remediate this.
    Internal,
}

///
/// QueryErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    /// Bad page size, unknown filter field or sort key.
    Invalid,

    /// The collection has no registered schema.
    Unsupported,
}

///
/// StoreErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StoreErrorKind {
    /// Stored or imported data does not decode.
    Corruption,

    /// Identifier uniqueness was violated.
    Conflict,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers and service boundaries.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Interface,
    Persist,
    Query,
    Schema,
    Serialize,
    Store,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Interface => Self::Interface,
            CoreErrorOrigin::Persist => Self::Persist,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Schema => Self::Schema,
            CoreErrorOrigin::Serialize => Self::Serialize,
            CoreErrorOrigin::Store => Self::Store,
        }
    }
}

///
/// TESTS
///
