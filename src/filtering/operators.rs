use chrono::{DateTime, NaiveDate, NaiveDateTime};
use sea_orm::{
    ColumnTrait, Value,
    sea_query::{BinOper, ColumnType, Expr, Func, SimpleExpr},
};
use uuid::Uuid;

use crate::errors::PaginationError;

// Basic safety limits
const MAX_FIELD_VALUE_LENGTH: usize = 10_000;

/// Comparable type of a column, read from its Sea-ORM definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    Boolean,
    Uuid,
    Date,
    DateTime,
    DateTimeTz,
    Text,
}

impl FieldKind {
    /// Classify a column by its declared column type
    #[must_use]
    pub fn of_column<C: ColumnTrait>(column: C) -> Self {
        match column.def().get_column_type() {
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned => Self::Integer,
            ColumnType::Float | ColumnType::Double | ColumnType::Decimal(_) => Self::Float,
            ColumnType::Boolean => Self::Boolean,
            ColumnType::Uuid => Self::Uuid,
            ColumnType::Date => Self::Date,
            ColumnType::DateTime | ColumnType::Timestamp => Self::DateTime,
            ColumnType::TimestampWithTimeZone => Self::DateTimeTz,
            _ => Self::Text,
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::Integer => "an integer",
            Self::Float => "a number",
            Self::Boolean => "true or false",
            Self::Uuid => "a UUID",
            Self::Date => "a date (YYYY-MM-DD)",
            Self::DateTime | Self::DateTimeTz => "an RFC 3339 timestamp",
            Self::Text => "text",
        }
    }

    /// Convert a raw query-string value into a bindable value of this kind.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFilterValue` when `raw` cannot be read as this kind.
    pub fn coerce(self, key: &str, raw: &str) -> Result<Value, PaginationError> {
        let trimmed = raw.trim();
        let invalid = || PaginationError::InvalidFilterValue {
            key: key.to_string(),
            value: raw.to_string(),
            expected: self.expected(),
        };

        let value: Value = match self {
            Self::Integer => trimmed.parse::<i64>().map_err(|_| invalid())?.into(),
            Self::Float => trimmed.parse::<f64>().map_err(|_| invalid())?.into(),
            Self::Boolean => match trimmed {
                "true" | "1" => true.into(),
                "false" | "0" => false.into(),
                _ => return Err(invalid()),
            },
            Self::Uuid => Uuid::parse_str(trimmed).map_err(|_| invalid())?.into(),
            Self::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map_err(|_| invalid())?
                .into(),
            Self::DateTime => parse_naive_datetime(trimmed).ok_or_else(invalid)?.into(),
            Self::DateTimeTz => DateTime::parse_from_rfc3339(trimmed)
                .map_err(|_| invalid())?
                .into(),
            Self::Text => raw.to_string().into(),
        };
        Ok(value)
    }
}

fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// A comparison against one field, ready to be rendered for the database.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equal(Value),
    Not(Value),
    MoreThan(Value),
    MoreThanOrEqual(Value),
    LessThan(Value),
    LessThanOrEqual(Value),
    /// Inclusive range
    Between(Value, Value),
    /// Case-sensitive pattern, already wrapped in `%`
    Like(String),
    /// Case-insensitive pattern, already wrapped in `%`
    ILike(String),
    In(Vec<Value>),
}

impl Predicate {
    /// Render this predicate against `column`
    #[must_use]
    pub fn to_expr<C: ColumnTrait>(&self, column: C) -> SimpleExpr {
        match self {
            Self::Equal(value) => column.eq(value.clone()),
            Self::Not(value) => column.ne(value.clone()),
            Self::MoreThan(value) => column.gt(value.clone()),
            Self::MoreThanOrEqual(value) => column.gte(value.clone()),
            Self::LessThan(value) => column.lt(value.clone()),
            Self::LessThanOrEqual(value) => column.lte(value.clone()),
            Self::Between(low, high) => column.between(low.clone(), high.clone()),
            Self::Like(pattern) => column.like(pattern.as_str()),
            Self::ILike(pattern) => {
                Expr::expr(Func::upper(Expr::col((column.entity_name(), column))))
                    .binary(BinOper::Like, Func::upper(Expr::val(pattern.as_str())))
            }
            Self::In(values) => column.is_in(values.iter().cloned()),
        }
    }
}

/// How many comma-separated values an operator consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// The raw value as-is
    Unary,
    /// Exactly two values, `lo,hi`
    Pair,
    /// One or more values
    List,
}

/// Operator tokens accepted in `where__field__operator` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    Not,
    MoreThan,
    MoreThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    ILike,
    Between,
    In,
}

impl Operator {
    pub const ALL: [Self; 10] = [
        Self::Equal,
        Self::Not,
        Self::MoreThan,
        Self::MoreThanOrEqual,
        Self::LessThan,
        Self::LessThanOrEqual,
        Self::Like,
        Self::ILike,
        Self::Between,
        Self::In,
    ];

    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Not => "not",
            Self::MoreThan => "more_than",
            Self::MoreThanOrEqual => "more_than_or_equal",
            Self::LessThan => "less_than",
            Self::LessThanOrEqual => "less_than_or_equal",
            Self::Like => "like",
            Self::ILike => "i_like",
            Self::Between => "between",
            Self::In => "in",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    #[must_use]
    pub fn arity(self) -> Arity {
        match self {
            Self::Between => Arity::Pair,
            Self::In => Arity::List,
            _ => Arity::Unary,
        }
    }

    /// Build the predicate for `raw`, coercing values to `kind`.
    ///
    /// Pattern operators wrap the value as `%value%` and never coerce.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperatorArity` when a pair operator does not get exactly
    /// two values, and `InvalidFilterValue` when a value does not coerce.
    pub fn build(self, key: &str, kind: FieldKind, raw: &str) -> Result<Predicate, PaginationError> {
        if raw.len() > MAX_FIELD_VALUE_LENGTH {
            return Err(PaginationError::InvalidFilterValue {
                key: key.to_string(),
                value: format!("{}...", raw.chars().take(32).collect::<String>()),
                expected: "a value of at most 10000 bytes",
            });
        }

        match self.arity() {
            Arity::Pair => {
                let values: Vec<&str> = raw.split(',').collect();
                if values.len() != 2 {
                    return Err(PaginationError::InvalidOperatorArity {
                        key: key.to_string(),
                        operator: self.token().to_string(),
                        expected: "2",
                        found: values.len(),
                    });
                }
                Ok(Predicate::Between(
                    kind.coerce(key, values[0])?,
                    kind.coerce(key, values[1])?,
                ))
            }
            Arity::List => {
                let values = raw
                    .split(',')
                    .map(|value| kind.coerce(key, value))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Predicate::In(values))
            }
            Arity::Unary => Ok(match self {
                Self::Like => Predicate::Like(format!("%{raw}%")),
                Self::ILike => Predicate::ILike(format!("%{raw}%")),
                Self::Not => Predicate::Not(kind.coerce(key, raw)?),
                Self::MoreThan => Predicate::MoreThan(kind.coerce(key, raw)?),
                Self::MoreThanOrEqual => Predicate::MoreThanOrEqual(kind.coerce(key, raw)?),
                Self::LessThan => Predicate::LessThan(kind.coerce(key, raw)?),
                Self::LessThanOrEqual => Predicate::LessThanOrEqual(kind.coerce(key, raw)?),
                Self::Equal | Self::Between | Self::In => Predicate::Equal(kind.coerce(key, raw)?),
            }),
        }
    }
}

/// The set of operators a resource accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRegistry {
    operators: Vec<Operator>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self {
            operators: Operator::ALL.to_vec(),
        }
    }
}

impl OperatorRegistry {
    /// Registry accepting only `operators`
    #[must_use]
    pub fn with_operators(operators: &[Operator]) -> Self {
        Self {
            operators: operators.to_vec(),
        }
    }

    #[must_use]
    pub fn contains(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }

    /// Look up the operator for `token`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOperator` when the token is not registered.
    pub fn resolve(&self, key: &str, token: &str) -> Result<Operator, PaginationError> {
        Operator::from_token(token)
            .filter(|op| self.contains(*op))
            .ok_or_else(|| PaginationError::UnknownOperator {
                key: key.to_string(),
                operator: token.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_pair_is_coerced() {
        let predicate = Operator::Between
            .build("where__age__between", FieldKind::Integer, "5,10")
            .unwrap();
        assert_eq!(predicate, Predicate::Between(5_i64.into(), 10_i64.into()));
    }

    #[test]
    fn test_between_without_comma_fails() {
        let err = Operator::Between
            .build("where__age__between", FieldKind::Integer, "5")
            .unwrap_err();
        assert_eq!(
            err,
            PaginationError::InvalidOperatorArity {
                key: "where__age__between".to_string(),
                operator: "between".to_string(),
                expected: "2",
                found: 1,
            }
        );
    }

    #[test]
    fn test_between_with_three_values_fails() {
        let err = Operator::Between
            .build("where__age__between", FieldKind::Integer, "1,2,3")
            .unwrap_err();
        assert!(matches!(err, PaginationError::InvalidOperatorArity { found: 3, .. }));
    }

    #[test]
    fn test_i_like_wraps_in_wildcards() {
        let predicate = Operator::ILike
            .build("where__title__i_like", FieldKind::Text, "rust")
            .unwrap();
        assert_eq!(predicate, Predicate::ILike("%rust%".to_string()));
    }

    #[test]
    fn test_numeric_operator_rejects_text_on_integer_field() {
        let err = Operator::MoreThan
            .build("where__likes__more_than", FieldKind::Integer, "many")
            .unwrap_err();
        assert!(matches!(
            err,
            PaginationError::InvalidFilterValue { expected: "an integer", .. }
        ));
    }

    #[test]
    fn test_text_fields_bypass_coercion() {
        let predicate = Operator::MoreThan
            .build("where__title__more_than", FieldKind::Text, "m")
            .unwrap();
        assert_eq!(predicate, Predicate::MoreThan("m".to_string().into()));
    }

    #[test]
    fn test_in_list() {
        let predicate = Operator::In
            .build("where__id__in", FieldKind::Integer, "1,2,3")
            .unwrap();
        assert_eq!(
            predicate,
            Predicate::In(vec![1_i64.into(), 2_i64.into(), 3_i64.into()])
        );
    }

    #[test]
    fn test_oversized_value_is_rejected() {
        let raw = "x".repeat(MAX_FIELD_VALUE_LENGTH + 1);
        let err = Operator::Equal
            .build("where__title", FieldKind::Text, &raw)
            .unwrap_err();
        assert!(matches!(err, PaginationError::InvalidFilterValue { .. }));
    }

    #[test]
    fn test_coerce_kinds() {
        assert_eq!(FieldKind::Boolean.coerce("k", "true").unwrap(), true.into());
        assert_eq!(FieldKind::Float.coerce("k", "2.5").unwrap(), 2.5_f64.into());
        assert!(FieldKind::Uuid.coerce("k", "not-a-uuid").is_err());
        assert!(FieldKind::Date.coerce("k", "2024-02-30").is_err());
        assert!(FieldKind::DateTimeTz.coerce("k", "2024-01-01T00:00:00Z").is_ok());
        assert!(FieldKind::DateTime.coerce("k", "2024-01-01 10:00:00").is_ok());
    }

    #[test]
    fn test_every_token_round_trips() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_token(op.token()), Some(op));
        }
    }

    #[test]
    fn test_registry_resolves_known_tokens() {
        let registry = OperatorRegistry::default();
        assert_eq!(
            registry.resolve("where__id__more_than", "more_than").unwrap(),
            Operator::MoreThan
        );
    }

    #[test]
    fn test_registry_unknown_operator() {
        let registry = OperatorRegistry::default();
        let err = registry.resolve("where__id__near", "near").unwrap_err();
        assert_eq!(
            err,
            PaginationError::UnknownOperator {
                key: "where__id__near".to_string(),
                operator: "near".to_string(),
            }
        );
    }

    #[test]
    fn test_restricted_registry_rejects_unlisted_operator() {
        let registry = OperatorRegistry::with_operators(&[Operator::MoreThan, Operator::LessThan]);
        assert!(registry.resolve("where__title__i_like", "i_like").is_err());
        assert!(registry.resolve("where__id__less_than", "less_than").is_ok());
    }
}
