//! Parameterized SELECT text assembly.
//!
//! [`SelectQuery`] accumulates the pieces of one SELECT statement
//! (projection, FROM, joins, WHERE fragments with their bound arguments,
//! GROUP BY, HAVING, ORDER BY, LIMIT/OFFSET) and renders them to `?`
//! placeholder SQL plus an argument list in placeholder order. Identifiers
//! come from entity configuration, never from requests; only values are
//! bound.

use sea_orm::Value;

/// One SELECT statement under construction.
///
/// Base-query hooks receive `&mut SelectQuery` and may reshape any part of
/// it before the request's filter, sort and paging state is applied on top.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    projection: Vec<String>,
    from: String,
    joins: Vec<String>,
    conditions: Vec<String>,
    condition_args: Vec<Value>,
    group_by: Vec<String>,
    having: Vec<String>,
    having_args: Vec<Value>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    /// Start a query over the given FROM clause (table, optionally aliased,
    /// e.g. `"users u"`).
    #[must_use]
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            from: table.into(),
            ..Self::default()
        }
    }

    /// Add explicit projection columns. Without any, the projection is `*`
    /// (alias-qualified when joins are present).
    pub fn columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a join clause verbatim (e.g. `"JOIN orders o ON o.user_id = u.id"`).
    pub fn join(&mut self, clause: impl Into<String>) -> &mut Self {
        self.joins.push(clause.into());
        self
    }

    /// AND a parameterized condition fragment onto the WHERE clause.
    pub fn and_where(&mut self, fragment: impl Into<String>, args: Vec<Value>) -> &mut Self {
        self.conditions.push(fragment.into());
        self.condition_args.extend(args);
        self
    }

    /// Add a GROUP BY column.
    pub fn group_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.group_by.push(column.into());
        self
    }

    /// AND a parameterized condition fragment onto the HAVING clause.
    pub fn having(&mut self, fragment: impl Into<String>, args: Vec<Value>) -> &mut Self {
        self.having.push(fragment.into());
        self.having_args.extend(args);
        self
    }

    /// Append an ORDER BY term (e.g. `"u.name ASC"`).
    pub fn order_by(&mut self, term: impl Into<String>) -> &mut Self {
        self.order_by.push(term.into());
        self
    }

    /// Set LIMIT and OFFSET.
    pub fn paginate(&mut self, limit: u64, offset: u64) -> &mut Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Whether any explicit projection column has been set.
    #[must_use]
    pub fn has_projection(&self) -> bool {
        !self.projection.is_empty()
    }

    /// Whether any join clause has been added.
    #[must_use]
    pub fn has_joins(&self) -> bool {
        !self.joins.is_empty()
    }

    /// Output names already claimed by aliased projection entries.
    ///
    /// An entry's alias is its last whitespace-separated token; single-token
    /// entries (`u.id`) claim nothing.
    pub(crate) fn projected_aliases(&self) -> Vec<String> {
        self.projection
            .iter()
            .filter_map(|entry| {
                let tokens: Vec<&str> = entry.split_whitespace().collect();
                match tokens.as_slice() {
                    [] | [_] => None,
                    [.., alias] => Some((*alias).to_string()),
                }
            })
            .collect()
    }

    /// The single top-level GROUP BY column, if exactly one is set.
    pub(crate) fn single_group_by(&self) -> Option<&str> {
        match self.group_by.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// The alias (or bare table name) of the FROM clause.
    fn from_alias(&self) -> &str {
        // "users u" and "users AS u" both alias to "u"
        self.from
            .split_whitespace()
            .filter(|token| !token.eq_ignore_ascii_case("AS"))
            .next_back()
            .unwrap_or(&self.from)
    }

    fn projection_sql(&self) -> String {
        if self.projection.is_empty() {
            if self.joins.is_empty() {
                "*".to_string()
            } else {
                // Unqualified * is ambiguous once joins are in play
                format!("{}.*", self.from_alias())
            }
        } else {
            self.projection.join(", ")
        }
    }

    fn render(&self, with_order_and_paging: bool) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.projection_sql(), self.from);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having.join(" AND "));
        }
        if with_order_and_paging {
            if !self.order_by.is_empty() {
                sql.push_str(" ORDER BY ");
                sql.push_str(&self.order_by.join(", "));
            }
            if let Some(limit) = self.limit {
                sql.push_str(&format!(" LIMIT {limit}"));
            }
            if let Some(offset) = self.offset {
                sql.push_str(&format!(" OFFSET {offset}"));
            }
        }

        sql
    }

    /// Render the full statement text with its arguments in placeholder
    /// order (WHERE arguments before HAVING arguments).
    #[must_use]
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut args = self.condition_args.clone();
        args.extend(self.having_args.iter().cloned());
        (self.render(true), args)
    }

    /// Render the statement without ORDER BY, LIMIT and OFFSET. This is the
    /// text the count query is derived from.
    pub(crate) fn unpaged_sql(&self) -> (String, Vec<Value>) {
        let mut args = self.condition_args.clone();
        args.extend(self.having_args.iter().cloned());
        (self.render(false), args)
    }
}
