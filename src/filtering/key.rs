//! Query-string key decoding.
//!
//! Filter and sort keys are encoded with a double-underscore delimiter:
//!
//! - `where__title` -> exact match on `title`
//! - `where__likes__more_than` -> operator filter on `likes`
//! - `order__createdAt` -> sort on `createdAt`

use crate::errors::PaginationError;

/// Segment delimiter inside filter keys
pub const KEY_DELIMITER: &str = "__";
pub const WHERE_PREFIX: &str = "where__";
pub const ORDER_PREFIX: &str = "order__";

/// Split a key on [`KEY_DELIMITER`].
///
/// Valid keys yield 2 segments (`["where", field]`, `["order", field]`) or
/// 3 segments (`["where", field, operator]`). Anything else is rejected with
/// [`PaginationError::MalformedFilterKey`]. A 3-segment `order__` key passes
/// here and is rejected by [`parse_key`].
///
/// # Errors
///
/// Returns `MalformedFilterKey` naming the key and the allowed lengths.
pub fn split_key(key: &str) -> Result<Vec<&str>, PaginationError> {
    let split: Vec<&str> = key.split(KEY_DELIMITER).collect();
    if split.len() != 2 && split.len() != 3 {
        let expected = if split.first() == Some(&"where") { "2 or 3" } else { "2" };
        return Err(PaginationError::MalformedFilterKey {
            key: key.to_string(),
            expected,
        });
    }
    Ok(split)
}

/// A decoded `where__`/`order__` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey<'a> {
    /// `where__field`
    Exact { field: &'a str },
    /// `where__field__operator`
    Operator { field: &'a str, operator: &'a str },
    /// `order__field`
    Order { field: &'a str },
}

impl<'a> FilterKey<'a> {
    #[must_use]
    pub fn field(&self) -> &'a str {
        match self {
            Self::Exact { field } | Self::Operator { field, .. } | Self::Order { field } => *field,
        }
    }
}

/// Decode a key into its typed form.
///
/// Returns `Ok(None)` for keys that are neither `where__` nor `order__`.
///
/// # Errors
///
/// Returns `MalformedFilterKey` when the segment count is wrong for the prefix.
pub fn parse_key(key: &str) -> Result<Option<FilterKey<'_>>, PaginationError> {
    if key.starts_with(WHERE_PREFIX) {
        let split = split_key(key)?;
        return match split.as_slice() {
            [_, field] => Ok(Some(FilterKey::Exact { field: *field })),
            [_, field, operator] => Ok(Some(FilterKey::Operator {
                field: *field,
                operator: *operator,
            })),
            _ => Err(PaginationError::MalformedFilterKey {
                key: key.to_string(),
                expected: "2 or 3",
            }),
        };
    }

    if key.starts_with(ORDER_PREFIX) {
        let split = split_key(key)?;
        return match split.as_slice() {
            [_, field] => Ok(Some(FilterKey::Order { field: *field })),
            _ => Err(PaginationError::MalformedFilterKey {
                key: key.to_string(),
                expected: "2",
            }),
        };
    }

    Ok(None)
}

/// Build the `where__{field}__{operator}` key for a field.
#[must_use]
pub fn operator_key(field: &str, operator: &str) -> String {
    format!("{WHERE_PREFIX}{field}{KEY_DELIMITER}{operator}")
}

/// Build the `order__{field}` key for a field.
#[must_use]
pub fn order_key(field: &str) -> String {
    format!("{ORDER_PREFIX}{field}")
}
