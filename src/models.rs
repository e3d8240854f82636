use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::PaginationError;
use crate::filtering::key::{ORDER_PREFIX, WHERE_PREFIX};
use crate::filtering::operators::Predicate;

/// Page size used when `take` is absent
pub const DEFAULT_TAKE: u64 = 20;

/// Documented pagination query parameters.
///
/// # Pagination
/// - **Offset mode:** send `page` (1-based) and optionally `take`, for example `page=2&take=10`
/// - **Cursor mode:** omit `page` and follow the `next` URL from the previous response
///
/// # Filtering
/// - `where__<field>=<value>` for an exact match
/// - `where__<field>__<operator>=<value>` with `operator` one of `equal`, `not`,
///   `more_than`, `more_than_or_equal`, `less_than`, `less_than_or_equal`,
///   `like`, `i_like`, `between` (`lo,hi`) or `in` (`a,b,c`)
///
/// # Sorting
/// - `order__<field>=ASC|DESC`, repeatable
#[derive(Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number for offset pagination (1-based).
    ///
    /// Example: `2`
    #[param(example = 2)]
    pub page: Option<u64>,
    /// Number of rows to return.
    ///
    /// Example: `20`
    #[param(example = 20)]
    pub take: Option<u64>,
}

/// Untrusted pagination input, as decoded from the query string.
///
/// Only `page`, `take` and `where__`/`order__` keys are retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationRequest {
    /// Present and non-zero selects offset mode
    pub page: Option<u64>,
    pub take: u64,
    params: Vec<(String, String)>,
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self {
            page: None,
            take: DEFAULT_TAKE,
            params: Vec::new(),
        }
    }
}

impl PaginationRequest {
    /// Build a request from decoded query pairs in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPaginationParameter` when `take` is not an integer ≥ 1
    /// or `page` is not a non-negative integer.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, PaginationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut request = Self::default();

        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                "page" => request.page = parse_page(&value)?,
                "take" => request.take = parse_take(&value)?,
                k if k.starts_with(WHERE_PREFIX) || k.starts_with(ORDER_PREFIX) => {
                    request.params.push((key, value));
                }
                _ => tracing::trace!(key = %key, "ignoring unrecognized query parameter"),
            }
        }

        Ok(request)
    }

    /// Parse a raw (still percent-encoded) query string.
    ///
    /// # Errors
    ///
    /// See [`PaginationRequest::from_pairs`].
    pub fn from_query(query: &str) -> Result<Self, PaginationError> {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    #[must_use]
    pub fn new(take: u64) -> Self {
        Self {
            take,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Append a `where__`/`order__` parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// `where__`/`order__` parameters in arrival order
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value of the last occurrence of `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether offset mode applies (`page` present and non-zero)
    #[must_use]
    pub fn is_offset(&self) -> bool {
        self.page.is_some_and(|page| page > 0)
    }
}

/// Largest `take`/`page` the database layer can bind as a signed 64-bit integer
pub const MAX_PAGINATION_VALUE: u64 = i64::MAX.unsigned_abs();

fn parse_take(value: &str) -> Result<u64, PaginationError> {
    match value.trim().parse::<u64>() {
        Ok(take) if (1..=MAX_PAGINATION_VALUE).contains(&take) => Ok(take),
        _ => Err(PaginationError::InvalidPaginationParameter {
            name: "take",
            value: value.to_string(),
        }),
    }
}

fn parse_page(value: &str) -> Result<Option<u64>, PaginationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(page) if page <= MAX_PAGINATION_VALUE => Ok(Some(page)),
        _ => Err(PaginationError::InvalidPaginationParameter {
            name: "page",
            value: value.to_string(),
        }),
    }
}

/// Sort direction, spelled exactly `ASC` or `DESC` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    /// Case-sensitive parse; only `ASC` and `DESC` are accepted
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl From<SortDirection> for sea_orm::Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

/// A predicate bound to a whitelisted column
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter<C> {
    pub column: C,
    pub predicate: Predicate,
}

/// One sort key, in priority order within [`QueryDescriptor::order`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey<C> {
    pub field: String,
    pub column: C,
    pub direction: SortDirection,
}

/// The query handed to a [`Repository`](crate::repository::Repository).
///
/// Built once per request and discarded after the call.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor<C> {
    /// Keyed by API field name; the last filter supplied for a field wins
    pub filters: BTreeMap<String, FieldFilter<C>>,
    pub order: Vec<SortKey<C>>,
    pub take: u64,
    /// Only set in offset mode
    pub skip: Option<u64>,
}

impl<C> QueryDescriptor<C> {
    /// Set the filter for a field, replacing any earlier one
    pub fn set_filter(&mut self, field: impl Into<String>, column: C, predicate: Predicate) {
        self.filters
            .insert(field.into(), FieldFilter { column, predicate });
    }

    /// Set the direction for a field, keeping its original position if already sorted
    pub fn set_order(&mut self, field: &str, column: C, direction: SortDirection) {
        if let Some(existing) = self.order.iter_mut().find(|key| key.field == field) {
            existing.column = column;
            existing.direction = direction;
        } else {
            self.order.push(SortKey {
                field: field.to_string(),
                column,
                direction,
            });
        }
    }

    /// Direction for `field`, if it is sorted on
    #[must_use]
    pub fn direction_of(&self, field: &str) -> Option<SortDirection> {
        self.order
            .iter()
            .find(|key| key.field == field)
            .map(|key| key.direction)
    }

    /// Apply caller overrides. Overrides win on collision.
    #[must_use]
    pub fn merge(mut self, overrides: FindOverrides<C>) -> Self {
        self.filters.extend(overrides.filters);
        if let Some(order) = overrides.order {
            self.order = order;
        }
        if let Some(take) = overrides.take {
            self.take = take;
        }
        if let Some(skip) = overrides.skip {
            self.skip = Some(skip);
        }
        self
    }
}

/// Caller-supplied query options applied on top of the composed query.
///
/// Filters merge per field; `order`, `take` and `skip` replace the composed value
/// when set.
#[derive(Debug, Clone, PartialEq)]
pub struct FindOverrides<C> {
    pub filters: BTreeMap<String, FieldFilter<C>>,
    pub order: Option<Vec<SortKey<C>>>,
    pub take: Option<u64>,
    pub skip: Option<u64>,
}

impl<C> Default for FindOverrides<C> {
    fn default() -> Self {
        Self {
            filters: BTreeMap::new(),
            order: None,
            take: None,
            skip: None,
        }
    }
}

impl<C> FindOverrides<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, column: C, predicate: Predicate) -> Self {
        self.filters
            .insert(field.into(), FieldFilter { column, predicate });
        self
    }

    #[must_use]
    pub fn order(mut self, order: Vec<SortKey<C>>) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }

    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }
}

/// Offset-mode envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetPage<T> {
    pub data: Vec<T>,
    /// Rows matching the filters, ignoring `take`/`skip`
    pub total: u64,
}

/// Boundary of a cursor page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CursorInfo {
    /// Identifier of the last row when the page was full
    pub after: Option<i64>,
}

/// Cursor-mode envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub data: Vec<T>,
    pub cursor: CursorInfo,
    pub count: usize,
    /// URL of the next page, or `null` when this page was short
    pub next: Option<String>,
}

/// Result of a pagination call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    Cursor(CursorPage<T>),
    Offset(OffsetPage<T>),
}

impl<T> Page<T> {
    #[must_use]
    pub fn data(&self) -> &[T] {
        match self {
            Self::Cursor(page) => &page.data,
            Self::Offset(page) => &page.data,
        }
    }

    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        match self {
            Self::Cursor(page) => page.data,
            Self::Offset(page) => page.data,
        }
    }
}
