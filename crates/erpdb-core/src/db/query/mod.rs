//! Module: query
//! Responsibility: filtered, sorted, paginated views over one collection.
//! Does not own: record storage or mutation.

mod execute;
mod paged;

#[cfg(test)]
mod tests;

pub use execute::execute;
pub use paged::Page;

use crate::{
    db::direction::Direction,
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use serde::Deserialize;
use thiserror::Error as ThisError;

/// Filter literal meaning "no filter on this field".
pub const ALL: &str = "all";

///
/// QueryError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("field '{field}' is not filterable on '{collection}'")]
    UnknownFilterField {
        collection: &'static str,
        field: String,
    },

    #[error("unknown sort key '{key}' on '{collection}'")]
    UnknownSortKey {
        collection: &'static str,
        key: String,
    },
}

impl From<QueryError> for InternalError {
    fn from(err: QueryError) -> Self {
        Self::new(ErrorClass::Validation, ErrorOrigin::Query, err.to_string())
    }
}

///
/// Filter
///
/// Categorical equality filter; the value `"all"` disables it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

impl Filter {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.value == ALL
    }
}

///
/// Sort
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    pub key: String,
    #[serde(default)]
    pub direction: Direction,
}

///
/// QueryParams
///
/// Per-call query input. Unset page size and sort fall back to the
/// configured default and the schema's default sort respectively.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryParams {
    pub page: u32,
    pub page_size: Option<u32>,
    pub query: Option<String>,
    pub filters: Vec<Filter>,
    pub sort: Option<Sort>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Free-text search; matched case-insensitively.
    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Equality filter on a categorical field (`"all"` disables it).
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter::new(field, value));
        self
    }

    /// Shorthand for a `status` filter.
    #[must_use]
    pub fn status(self, status: impl Into<String>) -> Self {
        self.filter("status", status)
    }

    #[must_use]
    pub fn sort_by(mut self, key: impl Into<String>, direction: Direction) -> Self {
        self.sort = Some(Sort {
            key: key.into(),
            direction,
        });
        self
    }
}

///
/// PageLimits
///
/// Configured bounds applied while resolving page parameters.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}
