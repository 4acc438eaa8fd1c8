//! Count-query derivation.
//!
//! The total-row count is computed by rewriting the data query's text (taken
//! before ORDER BY / LIMIT / OFFSET are appended) rather than by building a
//! second query from scratch, so base-query hooks that reshape the statement
//! are counted exactly as they filter.
//!
//! Rewrite rules:
//! - plain query: the projection up to the outermost FROM becomes `COUNT(*)`
//! - single-column top-level GROUP BY: projection becomes
//!   `COUNT(DISTINCT col)` and the GROUP BY clause is removed
//! - HAVING, or GROUP BY over several columns: the whole statement is
//!   wrapped in `SELECT COUNT(*) FROM (...) AS counted`
//!
//! Subqueries in the projection or WHERE clause are skipped by balancing
//! SELECT against FROM tokens; GROUP BY and HAVING are only recognized at
//! parenthesis depth zero.

use crate::errors::GridError;

/// Rewrite an unpaged SELECT statement into its count query.
///
/// Bound arguments are unaffected: every rewrite preserves the placeholders
/// and their order.
pub(crate) fn derive_count_query(sql: &str) -> Result<String, GridError> {
    let tokens: Vec<&str> = sql.split_whitespace().collect();

    // The outermost FROM is where SELECT and FROM tokens balance out
    let mut balance = 0i32;
    let mut from_idx = None;
    for (i, token) in tokens.iter().enumerate() {
        let bare = token.trim_matches(|c| c == '(' || c == ')');
        if bare.eq_ignore_ascii_case("SELECT") {
            balance += 1;
        } else if bare.eq_ignore_ascii_case("FROM") {
            balance -= 1;
            if balance == 0 {
                from_idx = Some(i);
                break;
            }
        }
    }
    let Some(from_idx) = from_idx else {
        return Err(GridError::build(format!(
            "no top-level FROM clause in '{sql}'"
        )));
    };

    // Locate top-level GROUP BY and HAVING, ignoring anything inside parens
    let mut depth = 0i32;
    let mut group_idx = None;
    let mut has_having = false;
    for (i, token) in tokens.iter().enumerate().skip(from_idx) {
        if depth == 0 {
            if token.eq_ignore_ascii_case("GROUP")
                && tokens
                    .get(i + 1)
                    .is_some_and(|next| next.eq_ignore_ascii_case("BY"))
            {
                group_idx = Some(i);
            } else if token.eq_ignore_ascii_case("HAVING") {
                has_having = true;
            }
        }
        depth += paren_delta(token);
    }

    // HAVING filters grouped rows, so only the wrapped form counts them
    // correctly
    if has_having {
        return Ok(wrap(sql));
    }

    if let Some(group_idx) = group_idx {
        let columns = &tokens[group_idx + 2..];
        match columns {
            [single] => {
                // One group column: the row count is its distinct count
                return Ok(format!(
                    "SELECT COUNT(DISTINCT {single}) {}",
                    tokens[from_idx..group_idx].join(" ")
                ));
            }
            _ => return Ok(wrap(sql)),
        }
    }

    Ok(format!("SELECT COUNT(*) {}", tokens[from_idx..].join(" ")))
}

fn wrap(sql: &str) -> String {
    format!("SELECT COUNT(*) FROM ({sql}) AS counted")
}

fn paren_delta(token: &str) -> i32 {
    let mut delta = 0;
    for c in token.chars() {
        match c {
            '(' => delta += 1,
            ')' => delta -= 1,
            _ => {}
        }
    }
    delta
}
