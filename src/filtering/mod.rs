//! # Filtering, Sorting & Paging Models
//!
//! The request-side expression models consumed by the fit pass and the SQL
//! builder:
//!
//! - **[`operator`]**: the closed [`FilterOperator`] set with its arity and
//!   `%`-decoration rules
//! - **[`group`]**: [`FilterTerm`] and the AND-of-OR filter expression
//! - **[`sort`]**: [`SortRule`] with the ASC/DESC allow-list
//! - **[`search`]**: free-text OR-of-LIKE expansion
//! - **[`pagination`]**: [`PageInput`] limit/offset arithmetic and the
//!   derived [`Paging`] response metadata
//!
//! All of these are constructed once per request, rewritten exactly once by
//! [`crate::fit::fit`] and consumed exactly once by
//! [`crate::query::build_statements`].

pub mod group;
pub mod operator;
pub mod pagination;
pub mod search;
pub mod sort;

pub use group::FilterTerm;
pub use operator::FilterOperator;
pub use pagination::{DEFAULT_PAGE_SIZE, PageInput, Paging};
pub use sort::SortRule;
