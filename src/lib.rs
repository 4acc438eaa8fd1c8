//! # gridcrate
//!
//! Request-to-SQL translation for data grids on axum and Sea-ORM.
//!
//! A grid request (filter expression, sort rules, page/size, free-text
//! search) arrives either as a JSON body or as flat query parameters. It is
//! fitted against a per-entity capability declaration (which fields may be
//! filtered, sorted or searched, and how their values convert), then
//! rendered to two parameterized SQL statements: the page query and a count
//! query derived from it. Identifiers come only from configuration; request
//! values only ever appear as bound arguments.
//!
//! ```rust,ignore
//! use gridcrate::{FieldDef, GridEntity, GridSource, grid_routes};
//!
//! #[derive(sea_orm::FromQueryResult, serde::Serialize)]
//! struct UserRow {
//!     id: uuid::Uuid,
//!     name: String,
//!     age: i64,
//! }
//!
//! impl GridSource for UserRow {
//!     fn grid() -> GridEntity {
//!         GridEntity::new("users u")
//!             .field(FieldDef::new("id", "u.id").typed("uuid"))
//!             .field(FieldDef::new("name", "u.name").searchable())
//!             .field(FieldDef::new("age", "u.age"))
//!             .default_sort("name", "ASC")
//!     }
//! }
//!
//! let app = axum::Router::new()
//!     .nest("/users/grid", grid_routes::<UserRow>())
//!     .with_state(db);
//! ```
//!
//! The pipeline is also usable piecewise: [`parse_query_pairs`] /
//! [`GridQuery`] for decoding, [`fit`] for name resolution and value
//! conversion, [`build_statements`] for the SQL text, and [`fetch_with`]
//! for execution against any Sea-ORM connection.

pub mod convert;
pub mod entity;
pub mod errors;
pub mod filtering;
pub mod fit;
pub mod models;
pub mod params;
pub mod query;
pub mod routes;
pub mod traits;

pub use convert::{ConversionError, ValueRegistry};
pub use entity::{BaseQueryHook, FieldDef, FilterHook, GridEntity, QueryHook};
pub use errors::GridError;
pub use filtering::{
    DEFAULT_PAGE_SIZE, FilterOperator, FilterTerm, PageInput, Paging, SortRule,
};
pub use fit::fit;
pub use models::{GridQuery, GridResponse};
pub use params::{encode_query_pairs, parse_query_pairs};
pub use query::{GridStatements, SelectQuery, build_statements};
pub use routes::{grid_get, grid_post, grid_routes};
pub use traits::{GridSource, fetch_with};
