//! Flat query-parameter encoding of grid requests.
//!
//! GET requests carry the same request model as the JSON body, flattened
//! into query parameters:
//!
//! ```text
//! _search=<text>
//! _page=<n>
//! _size=<n>
//! _sorter:<column>[:<index>]=<direction>
//! _filter:<column>:<operator>[:<group>]=<value[,value...]>
//! ```
//!
//! Filter keys sharing a group index are OR'd together; distinct group
//! indices are AND'd. The sorter index orders sort keys when several are
//! present. Omitted indices default to 0; sparse indices are compacted in
//! ascending order. Unknown keys are ignored and non-numeric page/size
//! values fall back to their defaults, but an unknown operator token is
//! rejected.

use std::collections::BTreeMap;

use crate::errors::GridError;
use crate::filtering::{FilterTerm, SortRule};
use crate::models::GridQuery;

const KEY_SEARCH: &str = "_search";
const KEY_PAGE: &str = "_page";
const KEY_SIZE: &str = "_size";
const PREFIX_SORTER: &str = "_sorter:";
const PREFIX_FILTER: &str = "_filter:";

/// Decode a grid query from URL query pairs, in the order received.
///
/// Later duplicates of scalar keys (`_search`, `_page`, `_size`) win;
/// repeated sorter/filter keys all contribute.
pub fn parse_query_pairs(pairs: &[(String, String)]) -> Result<GridQuery, GridError> {
    let mut query = GridQuery::new();
    let mut filter_groups: BTreeMap<u64, Vec<FilterTerm>> = BTreeMap::new();
    // keyed by (explicit index, encounter position) for a stable order
    let mut sort_rules: BTreeMap<(u64, usize), SortRule> = BTreeMap::new();

    for (position, (key, value)) in pairs.iter().enumerate() {
        match key.as_str() {
            KEY_SEARCH => query.search = value.clone(),
            KEY_PAGE => query.paging.page = numeric(value),
            KEY_SIZE => query.paging.items_per_page = numeric(value),
            key if key.starts_with(PREFIX_SORTER) => {
                let parts: Vec<&str> = key.split(':').collect();
                let Some(column) = parts.get(1).filter(|c| !c.is_empty()) else {
                    continue;
                };
                let index = parts.get(2).map_or(0, |raw| numeric(raw));
                sort_rules.insert((index, position), SortRule::new(*column, value.clone()));
            }
            key if key.starts_with(PREFIX_FILTER) => {
                let parts: Vec<&str> = key.split(':').collect();
                let (Some(column), Some(operator)) = (parts.get(1), parts.get(2)) else {
                    continue;
                };
                if column.is_empty() {
                    continue;
                }
                let operator = operator.parse()?;
                let group = parts.get(3).map_or(0, |raw| numeric(raw));
                let values = split_values(value);
                filter_groups
                    .entry(group)
                    .or_default()
                    .push(FilterTerm::new(*column, operator, values));
            }
            _ => {}
        }
    }

    query.filter = filter_groups.into_values().collect();
    query.sorter = sort_rules.into_values().collect();
    Ok(query)
}

/// Encode a grid query to URL query pairs.
///
/// Defaults are omitted; group and sorter indices are always written, so
/// the encoding re-parses to an equivalent query.
#[must_use]
pub fn encode_query_pairs(query: &GridQuery) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    if !query.search.is_empty() {
        pairs.push((KEY_SEARCH.to_string(), query.search.clone()));
    }
    if query.paging.page != 0 {
        pairs.push((KEY_PAGE.to_string(), query.paging.page.to_string()));
    }
    if query.paging.items_per_page != 0 {
        pairs.push((KEY_SIZE.to_string(), query.paging.items_per_page.to_string()));
    }
    for (index, rule) in query.sorter.iter().enumerate() {
        pairs.push((
            format!("{PREFIX_SORTER}{}:{index}", rule.column),
            rule.direction.clone(),
        ));
    }
    for (group, terms) in query.filter.iter().enumerate() {
        for term in terms {
            pairs.push((
                format!("{PREFIX_FILTER}{}:{}:{group}", term.column, term.operator),
                join_values(&term.values),
            ));
        }
    }

    pairs
}

fn numeric(raw: &str) -> u64 {
    raw.parse().unwrap_or(0)
}

fn split_values(raw: &str) -> Vec<serde_json::Value> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .map(|part| serde_json::Value::String(part.to_string()))
        .collect()
}

fn join_values(values: &[serde_json::Value]) -> String {
    values
        .iter()
        .map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}
