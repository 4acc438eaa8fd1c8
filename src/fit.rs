//! The fit pass.
//!
//! Fitting rewrites a [`GridQuery`] in place against one [`GridEntity`] and
//! a [`ValueRegistry`], exactly once per request, before any SQL is built:
//!
//! - filter terms resolve to storage columns with converted values; terms on
//!   unknown or non-filterable fields are left unresolved and render to
//!   nothing later (a hostile filter column can never reach SQL text)
//! - an empty sorter is seeded from the entity's default sort
//! - sort rules resolve to storage columns; an unknown or non-sortable sort
//!   column is a hard error, as is a direction outside ASC/DESC
//!
//! Terms are processed in order and the pass stops at the first conversion
//! failure.

use crate::convert::ValueRegistry;
use crate::entity::GridEntity;
use crate::errors::GridError;
use crate::filtering::SortRule;
use crate::filtering::sort::normalize_direction;
use crate::models::GridQuery;

/// Fit a query against an entity, resolving names and converting values.
pub fn fit(
    entity: &GridEntity,
    registry: &ValueRegistry,
    query: &mut GridQuery,
) -> Result<(), GridError> {
    for group in &mut query.filter {
        for term in group.iter_mut() {
            let Some(field) = entity.field_named(&term.column) else {
                continue;
            };
            // hooks fire only for terms that pass the capability gate
            if !field.filterable {
                continue;
            }

            // IS NULL / IS NOT NULL bind nothing, so nothing is converted
            let values = if term.operator.is_nullary() {
                Vec::new()
            } else {
                let mut converted = Vec::with_capacity(term.values.len());
                for raw in &term.values {
                    let value = registry
                        .convert(field.type_key.as_deref(), raw)
                        .map_err(|err| {
                            GridError::conversion(&term.column, err.value, err.expected)
                        })?;
                    converted.push(value);
                }
                converted
            };
            term.resolve(field.column.clone(), values);
        }
    }

    if query.sorter.is_empty() {
        for (column, direction) in entity.default_sort_rules() {
            query.sorter.push(SortRule::new(column, direction));
        }
    }
    for rule in &mut query.sorter {
        let field = entity
            .field_named(&rule.column)
            .filter(|field| field.sortable)
            .ok_or_else(|| GridError::unsortable_column(&rule.column))?;
        rule.direction = normalize_direction(&rule.column, &rule.direction)?;
        rule.resolved = Some(field.column.clone());
    }

    Ok(())
}
