//! Statement assembly for one fitted request.
//!
//! [`build_statements`] walks a fitted [`GridQuery`] over a [`GridEntity`]
//! and produces the final data and count statements. Per filter term the
//! dispatch order is: filter hook (custom WHERE fragment), query hook
//! (statement rewrite), then the operator's default rendering. Unresolved
//! terms contribute nothing.
//!
//! After the hooks have run, every non-skip field whose output name is not
//! already claimed by the projection is appended as `column AS api_name`,
//! so rows map onto request-facing names regardless of how the storage
//! columns are spelled.
//!
//! The count statement is derived from the data statement's text before
//! ORDER BY and paging are appended, so every hook rewrite is counted
//! exactly as it filters.

use sea_orm::Value;

use crate::entity::GridEntity;
use crate::errors::GridError;
use crate::models::GridQuery;
use crate::query::count::derive_count_query;

/// The two statements answering one grid request, with their bound
/// arguments in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct GridStatements {
    /// Data statement, including ORDER BY, LIMIT and OFFSET
    pub query: String,
    /// Bound arguments of the data statement
    pub args: Vec<Value>,
    /// Count statement derived from the data statement
    pub count_query: String,
    /// Bound arguments of the count statement
    pub count_args: Vec<Value>,
}

/// Build the data and count statements for a fitted query.
///
/// The query must have been fitted first; unfitted terms and sort rules are
/// skipped as if they were dropped by the fit pass.
pub fn build_statements(
    entity: &GridEntity,
    query: &GridQuery,
) -> Result<GridStatements, GridError> {
    let mut select = entity.base_select();

    for group in &query.filter {
        let mut fragments: Vec<String> = Vec::new();
        let mut args: Vec<Value> = Vec::new();

        for term in group {
            let Some(resolved) = &term.resolved else {
                continue;
            };

            if let Some(hook) = entity.filter_hook_for(&term.column) {
                let (fragment, hook_args) =
                    hook(&resolved.column, term.operator, &resolved.values);
                fragments.push(fragment);
                args.extend(hook_args);
            } else if let Some(hook) = entity.query_hook_for(&term.column) {
                hook(&mut select, term.operator, &resolved.values);
            } else if let Some((fragment, term_args)) = term.render()? {
                fragments.push(fragment);
                args.extend(term_args);
            }
        }

        match fragments.len() {
            0 => {}
            1 => {
                select.and_where(fragments.remove(0), args);
            }
            _ => {
                select.and_where(format!("({})", fragments.join(" OR ")), args);
            }
        }
    }

    if let Some((fragment, args)) =
        crate::filtering::search::search_condition(&query.search, &entity.searchable_columns())
    {
        select.and_where(fragment, args);
    }

    let claimed = select.projected_aliases();
    for field in entity.projected_fields() {
        if !claimed.contains(&field.name) {
            select.columns([format!("{} AS {}", field.column, field.name)]);
        }
    }

    let (unpaged, count_args) = select.unpaged_sql();
    let count_query = derive_count_query(&unpaged)?;

    for rule in &query.sorter {
        if let Some(term) = rule.order_by() {
            select.order_by(term);
        }
    }
    select.paginate(query.paging.limit(), query.paging.offset());

    let (sql, args) = select.to_sql();
    Ok(GridStatements {
        query: sql,
        args,
        count_query,
        count_args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ValueRegistry;
    use crate::entity::FieldDef;
    use crate::filtering::{FilterOperator, FilterTerm};
    use crate::fit::fit;

    fn entity() -> GridEntity {
        GridEntity::new("users u")
            .field(FieldDef::new("name", "u.name").searchable())
            .field(FieldDef::new("email", "u.email").searchable())
            .field(FieldDef::new("age", "u.age"))
            .field(FieldDef::new("id", "u.id").typed("uuid"))
            .default_sort("name", "ASC")
    }

    fn fitted(entity: &GridEntity, mut query: GridQuery) -> GridQuery {
        fit(entity, &ValueRegistry::with_defaults(), &mut query).unwrap();
        query
    }

    #[test]
    fn test_empty_query_defaults() {
        let entity = entity();
        let query = fitted(&entity, GridQuery::new());
        let stmts = build_statements(&entity, &query).unwrap();
        assert_eq!(
            stmts.query,
            "SELECT u.name AS name, u.email AS email, u.age AS age, u.id AS id \
             FROM users u ORDER BY u.name ASC LIMIT 10 OFFSET 0"
        );
        assert!(stmts.args.is_empty());
        assert_eq!(stmts.count_query, "SELECT COUNT(*) FROM users u");
        assert!(stmts.count_args.is_empty());
    }

    #[test]
    fn test_fields_projected_under_api_names() {
        let entity = GridEntity::new("users u")
            .field(FieldDef::new("username", "u.name"))
            .default_sort("username", "ASC");
        let query = fitted(&entity, GridQuery::new());
        let stmts = build_statements(&entity, &query).unwrap();
        assert_eq!(
            stmts.query,
            "SELECT u.name AS username FROM users u ORDER BY u.name ASC LIMIT 10 OFFSET 0"
        );
    }

    #[test]
    fn test_skip_field_left_out_of_projection_but_filterable() {
        let entity = GridEntity::new("users u")
            .field(FieldDef::new("name", "u.name"))
            .field(FieldDef::new("secret", "u.secret").skip());
        let query = fitted(
            &entity,
            GridQuery::new().and_term(FilterTerm::new("secret", FilterOperator::Nempty, vec![])),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        assert!(stmts.query.starts_with("SELECT u.name AS name FROM users u"));
        assert!(stmts.query.contains("WHERE u.secret IS NOT NULL"));
    }

    #[test]
    fn test_entity_without_fields_keeps_wildcard() {
        let entity = GridEntity::new("users u");
        let query = fitted(&entity, GridQuery::new());
        let stmts = build_statements(&entity, &query).unwrap();
        assert!(stmts.query.starts_with("SELECT * FROM users u"));
    }

    #[test]
    fn test_hook_on_non_filterable_field_renders_nothing() {
        let entity = GridEntity::new("users u")
            .field(FieldDef::new("secret", "u.secret").sortable_only())
            .filter_hook("secret", |column, _, values| {
                (format!("{column} = ?"), values.to_vec())
            });
        let query = fitted(
            &entity,
            GridQuery::new().and_term(FilterTerm::new(
                "secret",
                FilterOperator::Eq,
                vec![serde_json::json!("x")],
            )),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        assert!(!stmts.query.contains("WHERE"));
        assert!(stmts.args.is_empty());
    }

    #[test]
    fn test_or_group_parenthesized_and_groups_anded() {
        let entity = entity();
        let query = fitted(
            &entity,
            GridQuery::new()
                .and_filter(vec![
                    FilterTerm::new("name", FilterOperator::Like, vec![serde_json::json!("al")]),
                    FilterTerm::new("email", FilterOperator::Like, vec![serde_json::json!("al")]),
                ])
                .and_term(FilterTerm::new(
                    "age",
                    FilterOperator::Gte,
                    vec![serde_json::json!(30)],
                )),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        assert!(stmts.query.contains(
            "WHERE (u.name LIKE ? OR u.email LIKE ?) AND u.age >= ?"
        ));
        assert_eq!(
            stmts.args,
            vec![
                Value::from("%al%".to_string()),
                Value::from("%al%".to_string()),
                Value::from(30i64),
            ]
        );
    }

    #[test]
    fn test_dropped_terms_leave_no_trace() {
        let entity = entity();
        let query = fitted(
            &entity,
            GridQuery::new().and_filter(vec![
                FilterTerm::new("nope", FilterOperator::Eq, vec![serde_json::json!(1)]),
                FilterTerm::new("age", FilterOperator::Eq, vec![serde_json::json!(30)]),
            ]),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        // only the surviving term remains, without a dangling OR
        assert!(stmts.query.contains("WHERE u.age = ?"));
        assert!(!stmts.query.contains("nope"));
        assert_eq!(stmts.args.len(), 1);
    }

    #[test]
    fn test_fully_dropped_query_has_no_where_clause() {
        let entity = entity();
        let query = fitted(
            &entity,
            GridQuery::new().and_term(FilterTerm::new(
                "nope",
                FilterOperator::Eq,
                vec![serde_json::json!(1)],
            )),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        assert!(!stmts.query.contains("WHERE"));
    }

    #[test]
    fn test_uuid_term_binds_parsed_value() {
        let entity = entity();
        let raw = "f1611454-debb-4d9f-bd78-83f0d38b0176";
        let query = fitted(
            &entity,
            GridQuery::new().and_term(FilterTerm::new(
                "id",
                FilterOperator::Eq,
                vec![serde_json::json!(raw)],
            )),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        assert!(stmts.query.contains("WHERE u.id = ?"));
        assert_eq!(
            stmts.args,
            vec![Value::from(uuid::Uuid::parse_str(raw).unwrap())]
        );
    }

    #[test]
    fn test_search_expands_after_filters() {
        let entity = entity();
        let query = fitted(
            &entity,
            GridQuery::new()
                .and_term(FilterTerm::new(
                    "age",
                    FilterOperator::Gt,
                    vec![serde_json::json!(18)],
                ))
                .search("bob"),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        assert!(stmts.query.contains(
            "WHERE u.age > ? AND (u.name LIKE ? OR u.email LIKE ?)"
        ));
        assert_eq!(stmts.args.len(), 3);
    }

    #[test]
    fn test_count_statement_excludes_order_and_paging() {
        let entity = entity();
        let query = fitted(
            &entity,
            GridQuery::new()
                .and_term(FilterTerm::new(
                    "age",
                    FilterOperator::Gt,
                    vec![serde_json::json!(18)],
                ))
                .sort_by("age", "DESC")
                .page(3, 20),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        assert!(stmts.query.ends_with("ORDER BY u.age DESC LIMIT 20 OFFSET 40"));
        assert_eq!(
            stmts.count_query,
            "SELECT COUNT(*) FROM users u WHERE u.age > ?"
        );
        assert_eq!(stmts.count_args, stmts.args);
    }

    #[test]
    fn test_multiple_sort_rules_in_priority_order() {
        let entity = entity();
        let query = fitted(
            &entity,
            GridQuery::new().sort_by("age", "DESC").sort_by("name", ""),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        assert!(stmts.query.contains("ORDER BY u.age DESC, u.name ASC"));
    }

    #[test]
    fn test_filter_hook_replaces_default_rendering() {
        let entity = GridEntity::new("users u")
            .field(FieldDef::new("name", "u.name"))
            .filter_hook("name", |column, _, values| {
                (format!("LOWER({column}) = ?"), values.to_vec())
            });
        let query = fitted(
            &entity,
            GridQuery::new().and_term(FilterTerm::new(
                "name",
                FilterOperator::Eq,
                vec![serde_json::json!("Bob")],
            )),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        assert!(stmts.query.contains("WHERE LOWER(u.name) = ?"));
        assert_eq!(stmts.args, vec![Value::from("Bob".to_string())]);
    }

    #[test]
    fn test_query_hook_rewrites_statement_and_count_follows() {
        let entity = GridEntity::new("users u")
            .field(FieldDef::new("order_count", "order_count"))
            .base_query(|select| {
                select
                    .columns(["u.id", "COUNT(o.id) AS order_count"])
                    .join("JOIN orders o ON o.user_id = u.id")
                    .group_by("u.id");
            })
            .query_hook("order_count", |select, _, values| {
                select.having("COUNT(o.id) >= ?", values.to_vec());
            });
        let query = fitted(
            &entity,
            GridQuery::new().and_term(FilterTerm::new(
                "order_count",
                FilterOperator::Gte,
                vec![serde_json::json!(2)],
            )),
        );
        let stmts = build_statements(&entity, &query).unwrap();
        // the hook's projection column already claims the api name
        assert!(stmts.query.starts_with("SELECT u.id, COUNT(o.id) AS order_count FROM"));
        assert!(stmts.query.contains("GROUP BY u.id HAVING COUNT(o.id) >= ?"));
        assert!(
            stmts
                .count_query
                .starts_with("SELECT COUNT(*) FROM (SELECT u.id, COUNT(o.id) AS order_count FROM")
        );
        assert!(stmts.count_query.ends_with(") AS counted"));
        assert_eq!(stmts.count_args, vec![Value::from(2i64)]);
    }

    #[test]
    fn test_grouped_base_query_counts_distinct() {
        let entity = GridEntity::new("users u")
            .field(FieldDef::new("name", "u.name"))
            .base_query(|select| {
                select
                    .columns(["u.id"])
                    .join("JOIN orders o ON o.user_id = u.id")
                    .group_by("u.id");
            });
        let query = fitted(&entity, GridQuery::new());
        let stmts = build_statements(&entity, &query).unwrap();
        assert_eq!(
            stmts.count_query,
            "SELECT COUNT(DISTINCT u.id) FROM users u JOIN orders o ON o.user_id = u.id"
        );
    }

    #[test]
    fn test_arity_violation_propagates() {
        let entity = entity();
        let query = fitted(
            &entity,
            GridQuery::new().and_term(FilterTerm::new(
                "age",
                FilterOperator::Between,
                vec![serde_json::json!(1)],
            )),
        );
        let err = build_statements(&entity, &query).unwrap_err();
        assert!(matches!(err, GridError::Arity { .. }));
    }
}
