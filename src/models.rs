//! Request and response envelopes.
//!
//! [`GridQuery`] is the deserialized request body (or the equivalent decoded
//! from flat query parameters); [`GridResponse`] wraps one page of rows
//! together with paging metadata and an echo of the request state, so grid
//! clients can rehydrate their controls from the response alone.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::filtering::{FilterTerm, PageInput, Paging, SortRule};

/// One grid request: filter expression, sort rules, paging and free-text
/// search.
///
/// The filter is an AND of OR-groups: every inner list is OR'd together,
/// the outer list is AND'd. An empty query selects everything on the first
/// default-sized page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GridQuery {
    /// AND-of-OR filter expression
    #[serde(default)]
    pub filter: Vec<Vec<FilterTerm>>,
    /// Sort rules in priority order
    #[serde(default)]
    pub sorter: Vec<SortRule>,
    /// Page number and size
    #[serde(default)]
    pub paging: PageInput,
    /// Free-text search over the entity's searchable fields
    #[serde(default)]
    pub search: String,
}

impl GridQuery {
    /// An empty query: no filter, no sort, default paging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// AND an OR-group of terms onto the filter expression.
    #[must_use]
    pub fn and_filter(mut self, group: Vec<FilterTerm>) -> Self {
        self.filter.push(group);
        self
    }

    /// AND a single term onto the filter expression (an OR-group of one).
    #[must_use]
    pub fn and_term(self, term: FilterTerm) -> Self {
        self.and_filter(vec![term])
    }

    /// Append a sort rule.
    #[must_use]
    pub fn sort_by(mut self, column: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sorter.push(SortRule::new(column, direction));
        self
    }

    /// Set page number and size.
    #[must_use]
    pub fn page(mut self, page: u64, items_per_page: u64) -> Self {
        self.paging = PageInput::new(page, items_per_page);
        self
    }

    /// Set the free-text search value.
    #[must_use]
    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = value.into();
        self
    }
}

/// One page of rows plus the request state that produced it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GridResponse<T> {
    /// The rows of the requested page
    pub items: Vec<T>,
    /// Derived paging metadata
    pub paging: Paging,
    /// Echo of the search value
    pub search: String,
    /// Echo of the sort rules as applied (directions normalized, default
    /// sort filled in)
    pub sorter: Vec<SortRule>,
    /// Echo of the filter expression as supplied
    pub filter: Vec<Vec<FilterTerm>>,
}
