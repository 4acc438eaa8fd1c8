//! The closed filter-operator set and its arity/decoration rules.

use sea_orm::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::GridError;

/// Comparison operators for filter terms.
///
/// Wire tokens are the uppercase names (`EQ`, `NBETWEEN`, ...); an empty
/// operator string parses as [`FilterOperator::Eq`]. Tokens are
/// case-sensitive and the set is closed - anything else is an input error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterOperator {
    /// Equality (=), the default
    #[default]
    Eq,
    /// Not equal (!=)
    Neq,
    /// Greater than (>)
    Gt,
    /// Less than (<)
    Lt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than or equal (<=)
    Lte,
    /// Substring match (LIKE %v%)
    Like,
    /// Negated substring match (NOT LIKE %v%)
    Nlike,
    /// Prefix match (LIKE v%)
    Starts,
    /// Suffix match (LIKE %v)
    Ends,
    /// IS NULL
    Empty,
    /// IS NOT NULL
    Nempty,
    /// Half-open range: >= lower AND < upper
    Between,
    /// Outside the half-open range: < lower OR >= upper
    Nbetween,
    /// IN (...), sized to the value count
    In,
    /// NOT IN (...), sized to the value count
    Nin,
}

impl FilterOperator {
    /// The wire token for this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Neq => "NEQ",
            Self::Gt => "GT",
            Self::Lt => "LT",
            Self::Gte => "GTE",
            Self::Lte => "LTE",
            Self::Like => "LIKE",
            Self::Nlike => "NLIKE",
            Self::Starts => "STARTS",
            Self::Ends => "ENDS",
            Self::Empty => "EMPTY",
            Self::Nempty => "NEMPTY",
            Self::Between => "BETWEEN",
            Self::Nbetween => "NBETWEEN",
            Self::In => "IN",
            Self::Nin => "NIN",
        }
    }

    /// Minimum number of values required to render valid SQL.
    ///
    /// Checked at SQL-generation time, not at parse time.
    #[must_use]
    pub const fn min_arity(self) -> usize {
        match self {
            Self::Empty | Self::Nempty => 0,
            Self::Between | Self::Nbetween => 2,
            _ => 1,
        }
    }

    /// Whether this operator binds no arguments at all.
    #[must_use]
    pub const fn is_nullary(self) -> bool {
        matches!(self, Self::Empty | Self::Nempty)
    }

    /// Apply the operator's `%` pattern decoration to a bound value.
    ///
    /// Only string values are decorated; converted non-string values pass
    /// through untouched.
    #[must_use]
    pub(crate) fn decorate(self, value: &Value) -> Value {
        let Value::String(Some(s)) = value else {
            return value.clone();
        };
        match self {
            Self::Like | Self::Nlike => Value::from(format!("%{s}%")),
            Self::Starts => Value::from(format!("{s}%")),
            Self::Ends => Value::from(format!("%{s}")),
            _ => value.clone(),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "EQ" => Ok(Self::Eq),
            "NEQ" => Ok(Self::Neq),
            "GT" => Ok(Self::Gt),
            "LT" => Ok(Self::Lt),
            "GTE" => Ok(Self::Gte),
            "LTE" => Ok(Self::Lte),
            "LIKE" => Ok(Self::Like),
            "NLIKE" => Ok(Self::Nlike),
            "STARTS" => Ok(Self::Starts),
            "ENDS" => Ok(Self::Ends),
            "EMPTY" => Ok(Self::Empty),
            "NEMPTY" => Ok(Self::Nempty),
            "BETWEEN" => Ok(Self::Between),
            "NBETWEEN" => Ok(Self::Nbetween),
            "IN" => Ok(Self::In),
            "NIN" => Ok(Self::Nin),
            other => Err(GridError::input(format!(
                "unknown filter operator: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for FilterOperator {
    type Error = GridError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_defaults_to_eq() {
        assert_eq!("".parse::<FilterOperator>().unwrap(), FilterOperator::Eq);
    }

    #[test]
    fn test_tokens_round_trip() {
        for op in [
            FilterOperator::Eq,
            FilterOperator::Neq,
            FilterOperator::Gt,
            FilterOperator::Lt,
            FilterOperator::Gte,
            FilterOperator::Lte,
            FilterOperator::Like,
            FilterOperator::Nlike,
            FilterOperator::Starts,
            FilterOperator::Ends,
            FilterOperator::Empty,
            FilterOperator::Nempty,
            FilterOperator::Between,
            FilterOperator::Nbetween,
            FilterOperator::In,
            FilterOperator::Nin,
        ] {
            assert_eq!(op.as_str().parse::<FilterOperator>().unwrap(), op);
        }
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert!("eq".parse::<FilterOperator>().is_err());
        assert!("between".parse::<FilterOperator>().is_err());
    }

    #[test]
    fn test_unknown_token_rejected() {
        assert!("REGEX".parse::<FilterOperator>().is_err());
    }

    #[test]
    fn test_min_arity() {
        assert_eq!(FilterOperator::Empty.min_arity(), 0);
        assert_eq!(FilterOperator::Nempty.min_arity(), 0);
        assert_eq!(FilterOperator::Between.min_arity(), 2);
        assert_eq!(FilterOperator::Nbetween.min_arity(), 2);
        assert_eq!(FilterOperator::Eq.min_arity(), 1);
        assert_eq!(FilterOperator::In.min_arity(), 1);
    }

    #[test]
    fn test_like_decoration() {
        let v = Value::from("abc".to_string());
        assert_eq!(
            FilterOperator::Like.decorate(&v),
            Value::from("%abc%".to_string())
        );
        assert_eq!(
            FilterOperator::Starts.decorate(&v),
            Value::from("abc%".to_string())
        );
        assert_eq!(
            FilterOperator::Ends.decorate(&v),
            Value::from("%abc".to_string())
        );
        assert_eq!(FilterOperator::Eq.decorate(&v), v);
    }

    #[test]
    fn test_decoration_skips_non_strings() {
        let v = Value::from(42i64);
        assert_eq!(FilterOperator::Like.decorate(&v), v);
    }

    #[test]
    fn test_serde_tokens() {
        let op: FilterOperator = serde_json::from_str("\"NBETWEEN\"").unwrap();
        assert_eq!(op, FilterOperator::Nbetween);
        let op: FilterOperator = serde_json::from_str("\"\"").unwrap();
        assert_eq!(op, FilterOperator::Eq);
        assert_eq!(
            serde_json::to_string(&FilterOperator::Nlike).unwrap(),
            "\"NLIKE\""
        );
        assert!(serde_json::from_str::<FilterOperator>("\"WAT\"").is_err());
    }
}
