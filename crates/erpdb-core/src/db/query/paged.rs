//! Module: query::paged
//! Responsibility: paged query response payload.

use serde::{Deserialize, Serialize};

///
/// Page
///
/// One page of a query result plus the totals needed to render pagination.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` rows, `0` when there are none.
    #[must_use]
    pub fn page_count(total: usize, page_size: u32) -> u32 {
        if page_size == 0 {
            return 0;
        }
        let pages = total.div_ceil(page_size as usize);

        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Convert the payload rows, keeping the pagination totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }

    /// Fallible `map`; the first error aborts the conversion.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            data: self.data.into_iter().map(f).collect::<Result<_, _>>()?,
            total: self.total,
            current_page: self.current_page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        })
    }
}
