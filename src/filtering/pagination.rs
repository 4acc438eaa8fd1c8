//! Page/size input and the derived response paging metadata.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Items per page when the request supplies none (or zero).
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Requested page and page size.
///
/// Both default to zero on the wire; accessors apply the clamping rules
/// (page floors at 1, size falls back to [`DEFAULT_PAGE_SIZE`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageInput {
    /// 1-based page number
    #[serde(default)]
    pub page: u64,
    /// Page size; 0 selects the default
    #[serde(default, rename = "itemsPerPage")]
    pub items_per_page: u64,
}

impl PageInput {
    /// Create a page request.
    #[must_use]
    pub fn new(page: u64, items_per_page: u64) -> Self {
        Self {
            page,
            items_per_page,
        }
    }

    /// Effective page number, clamped to at least 1.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// LIMIT value.
    #[must_use]
    pub fn limit(&self) -> u64 {
        if self.items_per_page == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.items_per_page
        }
    }

    /// OFFSET value.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

/// Response-time paging metadata, derived from the page input and the count
/// query result. Not stored anywhere - computed once per response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Effective page number
    pub page: u64,
    /// Total matching rows
    pub total: u64,
    /// Effective page size
    pub items_per_page: u64,
    /// Last page holding any rows, at least 1
    pub last_page: u64,
    /// Next page, clamped to the last page
    pub next_page: u64,
    /// Previous page, clamped to 1
    pub previous_page: u64,
}

impl Paging {
    /// Derive paging metadata from the request input and the total count.
    #[must_use]
    pub fn compute(input: PageInput, total: u64) -> Self {
        let page = input.page();
        let limit = input.limit();
        let last_page = total.div_ceil(limit).max(1);
        Self {
            page,
            total,
            items_per_page: limit,
            last_page,
            next_page: (page + 1).min(last_page),
            previous_page: (page - 1).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let input = PageInput::default();
        assert_eq!(input.page(), 1);
        assert_eq!(input.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(input.offset(), 0);
    }

    #[test]
    fn test_offset_arithmetic() {
        let input = PageInput::new(3, 20);
        assert_eq!(input.limit(), 20);
        assert_eq!(input.offset(), 40);
    }

    #[test]
    fn test_paging_45_rows_20_per_page() {
        let paging = Paging::compute(PageInput::new(3, 20), 45);
        assert_eq!(paging.last_page, 3);
        assert_eq!(paging.next_page, 3);
        assert_eq!(paging.previous_page, 2);
        assert_eq!(paging.total, 45);
        assert_eq!(paging.items_per_page, 20);
    }

    #[test]
    fn test_paging_first_page() {
        let paging = Paging::compute(PageInput::new(1, 20), 45);
        assert_eq!(paging.next_page, 2);
        assert_eq!(paging.previous_page, 1);
    }

    #[test]
    fn test_paging_exact_multiple() {
        let paging = Paging::compute(PageInput::new(1, 20), 40);
        assert_eq!(paging.last_page, 2);
    }

    #[test]
    fn test_paging_empty_result_clamps_to_page_one() {
        let paging = Paging::compute(PageInput::new(1, 20), 0);
        assert_eq!(paging.last_page, 1);
        assert_eq!(paging.next_page, 1);
        assert_eq!(paging.previous_page, 1);
    }
}
