use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// Direction
///
/// Sort direction shared by query parameters, schemas, and configuration.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    /// Orient an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}
