//! Offset pagination types for list endpoints.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::config::{DEFAULT_PAGE_INDEX, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{ApiResult, Failure};

/// Offset pagination parameters (reusable across all list endpoints)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    /// Zero-based page index
    pub page_index: u64,
    /// Requested page size, bounded by [`MAX_PAGE_SIZE`]
    pub page_size: u64,
    /// Bypass the page cache and read from the store
    pub no_cache: bool,
}

impl PageParams {
    pub fn new(page_index: u64, page_size: u64, no_cache: bool) -> Self {
        Self {
            page_index,
            page_size,
            no_cache,
        }
    }

    /// Reject out-of-bounds page sizes before any data access.
    pub fn validate(&self) -> ApiResult<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Failure::validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Number of rows to skip for this page.
    ///
    /// Saturates: the index is client-supplied and unbounded, and an
    /// absurd one must yield an empty page, not a wrapped offset.
    pub fn offset(&self) -> u64 {
        self.page_index.saturating_mul(self.page_size)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE_INDEX,
            page_size: DEFAULT_PAGE_SIZE,
            no_cache: false,
        }
    }
}

/// One offset-paginated page of results.
///
/// `total_pages`, `has_previous_page` and `has_next_page` are always derived
/// from the stored index, size and total count at the moment they are asked
/// for. They are deliberately not fields, so they can never go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub page_index: u64,
    pub page_size: u64,
    pub total_count: u64,
}

impl<T> OffsetPage<T> {
    pub fn new(items: Vec<T>, page_index: u64, page_size: u64, total_count: u64) -> Self {
        Self {
            items,
            page_index,
            page_size,
            total_count,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next_page(&self) -> bool {
        // Saturates for the same reason as `PageParams::offset`
        self.page_index
            .saturating_add(1)
            .saturating_mul(self.page_size)
            < self.total_count
    }

    /// Map the items while keeping the page bookkeeping intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> OffsetPage<U> {
        OffsetPage {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }
}

impl<T: Serialize> Serialize for OffsetPage<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OffsetPage", 7)?;
        state.serialize_field("items", &self.items)?;
        state.serialize_field("pageIndex", &self.page_index)?;
        state.serialize_field("pageSize", &self.page_size)?;
        state.serialize_field("totalCount", &self.total_count)?;
        state.serialize_field("totalPages", &self.total_pages())?;
        state.serialize_field("hasPreviousPage", &self.has_previous_page())?;
        state.serialize_field("hasNextPage", &self.has_next_page())?;
        state.end()
    }
}
