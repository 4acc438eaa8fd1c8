//! Grid entity configuration.
//!
//! A [`GridEntity`] describes one queryable surface: the FROM clause, the
//! request-facing fields with their storage columns and capabilities, the
//! per-field hooks and the default sort. Entities are built once at
//! application setup and shared read-only by every request.
//!
//! ```rust,ignore
//! let users = GridEntity::new("users u")
//!     .field(FieldDef::new("name", "u.name").searchable())
//!     .field(FieldDef::new("age", "u.age").sortable_only())
//!     .field(FieldDef::new("id", "u.id").typed("uuid"))
//!     .default_sort("name", "ASC");
//! ```

use std::collections::HashMap;

use sea_orm::Value;

use crate::filtering::operator::FilterOperator;
use crate::query::SelectQuery;

/// Replaces the default SQL rendering of one field's filter terms.
///
/// Receives the field's storage column, the term's operator and the
/// converted values; returns a parameterized WHERE fragment with its bound
/// arguments.
pub type FilterHook =
    Box<dyn Fn(&str, FilterOperator, &[Value]) -> (String, Vec<Value>) + Send + Sync>;

/// Rewrites the query itself for one field's filter terms, for conditions
/// that cannot live in the WHERE clause (HAVING over an aggregate, an extra
/// join).
pub type QueryHook =
    Box<dyn Fn(&mut SelectQuery, FilterOperator, &[Value]) + Send + Sync>;

/// Reshapes the base statement before any request state is applied
/// (projection, joins, fixed conditions).
pub type BaseQueryHook = Box<dyn Fn(&mut SelectQuery) + Send + Sync>;

/// One request-facing field and its capabilities.
///
/// All capabilities are off until granted; a field with none can still be
/// selected by the base query but no request input can reference it.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Request-facing name, as it appears in filter and sorter input
    pub name: String,
    /// Storage column, as interpolated into SQL text
    pub column: String,
    /// Whether filter terms may reference this field
    pub filterable: bool,
    /// Whether sort rules may reference this field
    pub sortable: bool,
    /// Whether free-text search expands over this field
    pub searchable: bool,
    /// Whether the field is left out of the appended projection
    pub skip: bool,
    /// Conversion type key looked up in the value registry
    pub type_key: Option<String>,
}

impl FieldDef {
    /// A filterable, sortable field mapping `name` to `column`.
    #[must_use]
    pub fn new(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            filterable: true,
            sortable: true,
            searchable: false,
            skip: false,
            type_key: None,
        }
    }

    /// Include this field in free-text search expansion.
    #[must_use]
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Drop the filterable capability, keeping sort.
    #[must_use]
    pub fn sortable_only(mut self) -> Self {
        self.filterable = false;
        self
    }

    /// Drop the sortable capability, keeping filter.
    #[must_use]
    pub fn filterable_only(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Leave this field out of the appended `column AS api_name` projection.
    ///
    /// Its filter/sort/search capabilities are unaffected.
    #[must_use]
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Attach a conversion type key (e.g. `"uuid"`, `"timestamp"`).
    #[must_use]
    pub fn typed(mut self, type_key: impl Into<String>) -> Self {
        self.type_key = Some(type_key.into());
        self
    }
}

/// One queryable surface: FROM clause, fields, hooks and default sort.
pub struct GridEntity {
    /// FROM clause text (table, optionally aliased)
    pub table: String,
    fields: Vec<FieldDef>,
    filter_hooks: HashMap<String, FilterHook>,
    query_hooks: HashMap<String, QueryHook>,
    base_query: Option<BaseQueryHook>,
    default_sort: Vec<(String, String)>,
}

impl GridEntity {
    /// Start an entity over the given FROM clause.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            filter_hooks: HashMap::new(),
            query_hooks: HashMap::new(),
            base_query: None,
            default_sort: Vec::new(),
        }
    }

    /// Add a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Replace the SQL rendering of filter terms on the named field.
    #[must_use]
    pub fn filter_hook<F>(mut self, field: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&str, FilterOperator, &[Value]) -> (String, Vec<Value>) + Send + Sync + 'static,
    {
        self.filter_hooks.insert(field.into(), Box::new(hook));
        self
    }

    /// Route filter terms on the named field into a query rewrite instead of
    /// the WHERE clause.
    #[must_use]
    pub fn query_hook<F>(mut self, field: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut SelectQuery, FilterOperator, &[Value]) + Send + Sync + 'static,
    {
        self.query_hooks.insert(field.into(), Box::new(hook));
        self
    }

    /// Reshape the base statement (projection, joins, fixed conditions)
    /// before request state is applied.
    #[must_use]
    pub fn base_query<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut SelectQuery) + Send + Sync + 'static,
    {
        self.base_query = Some(Box::new(hook));
        self
    }

    /// Append a sort rule applied when the request carries no sorter.
    ///
    /// May be called several times; the rules keep their declaration order
    /// (e.g. `created DESC, id DESC`).
    #[must_use]
    pub fn default_sort(
        mut self,
        column: impl Into<String>,
        direction: impl Into<String>,
    ) -> Self {
        self.default_sort.push((column.into(), direction.into()));
        self
    }

    /// Look up a field by request-facing name.
    #[must_use]
    pub fn field_named(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Storage columns of every search-capable field, in declaration order.
    #[must_use]
    pub fn searchable_columns(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| field.searchable)
            .map(|field| field.column.clone())
            .collect()
    }

    pub(crate) fn filter_hook_for(&self, field: &str) -> Option<&FilterHook> {
        self.filter_hooks.get(field)
    }

    pub(crate) fn query_hook_for(&self, field: &str) -> Option<&QueryHook> {
        self.query_hooks.get(field)
    }

    /// Fields included in the appended projection, in declaration order.
    pub(crate) fn projected_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| !field.skip)
    }

    pub(crate) fn default_sort_rules(&self) -> &[(String, String)] {
        &self.default_sort
    }

    /// The base statement for this entity, with any base-query hook applied.
    #[must_use]
    pub fn base_select(&self) -> SelectQuery {
        let mut query = SelectQuery::from(self.table.clone());
        if let Some(hook) = &self.base_query {
            hook(&mut query);
        }
        query
    }
}
