//! # SQL Statement Construction
//!
//! Text-level SQL assembly for grid requests:
//!
//! - **[`select`]**: [`SelectQuery`], the parameterized SELECT accumulator
//! - **[`count`]**: derivation of the count statement from the data
//!   statement's text
//! - **[`builder`]**: [`build_statements`], walking a fitted request into
//!   its final [`GridStatements`]
//!
//! All identifiers in the produced text come from entity configuration;
//! request values only ever appear as bound arguments.

pub mod builder;
pub mod count;
pub mod select;

pub use builder::{GridStatements, build_statements};
pub use select::SelectQuery;
