//! Core runtime for ErpDB: record identity, schemas, the record store,
//! query and aggregation engines, persistence, and observability.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod obs;
pub mod record;
pub mod schema;
pub mod serialize;
pub mod traits;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Field name carrying the record identifier.
pub const ID_FIELD: &str = "id";

/// Field name carrying the creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Field name carrying the last-update timestamp.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Server-assigned fields; stripped from caller-supplied fields and patches.
pub const RESERVED_FIELDS: [&str; 3] = [ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD];

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, executors, stores, serializers, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{
            Db,
            direction::Direction,
            query::{Page, QueryParams},
        },
        record::{Fields, Record},
        schema::{FieldAccessor, FieldSpec, FieldType, Schema, SortKey},
        traits::EntityKind,
        types::RecordId,
    };
}
