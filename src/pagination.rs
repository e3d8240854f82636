//! # Pagination Strategy
//!
//! [`Paginator::paginate`] picks a mode from the request and runs it:
//!
//! - **Offset mode** (`page` present and non-zero): one `find_and_count`, answered
//!   with `{ data, total }`.
//! - **Cursor mode** (otherwise): one `find`, answered with
//!   `{ data, cursor: { after }, count, next }`. A full page (`data.len() == take`)
//!   gets a `next` URL that walks past its last row; a short page gets `null`.
//!
//! The `next` URL is produced by [`build_next_url`], which re-emits the request and
//! appends exactly one boundary on the identifier field. The boundary operator
//! follows the cursor sort direction: `more_than` for `ASC`, `less_than` for `DESC`.

use sea_orm::{ModelTrait, Value};
use url::Url;

use crate::config::PaginationConfig;
use crate::errors::ApiError;
use crate::filtering::compose;
use crate::filtering::key::{operator_key, order_key};
use crate::filtering::operators::Operator;
use crate::models::{
    CursorInfo, CursorPage, FindOverrides, OffsetPage, Page, PaginationRequest, QueryDescriptor,
    SortDirection,
};
use crate::repository::Repository;
use crate::traits::{ColumnOf, ModelOf, Paginated};

/// Runs pagination requests against a repository.
///
/// Holds no per-request state; one instance is shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginationConfig,
}

impl Paginator {
    #[must_use]
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Paginate resource `T`.
    ///
    /// The composed query is merged with `T::default_overrides()` and then with
    /// `overrides`, so caller overrides win over both the request and the
    /// resource defaults. `resource_path` is the path segment used in `next`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::BadRequest`] when the request cannot be composed; the
    ///   repository is not called in that case
    /// - [`ApiError::Database`] when the repository fails
    /// - [`ApiError::Internal`] when the base URL is invalid or the last row's
    ///   identifier is not an integer
    pub async fn paginate<T, R>(
        &self,
        request: &PaginationRequest,
        repository: &R,
        overrides: FindOverrides<ColumnOf<T>>,
        resource_path: &str,
    ) -> Result<Page<T>, ApiError>
    where
        T: Paginated,
        R: Repository<Column = ColumnOf<T>, Row = ModelOf<T>>,
    {
        let query = compose::<T>(request)?
            .merge(T::default_overrides())
            .merge(overrides);

        if request.is_offset() {
            if has_cursor_boundary::<T>(request) {
                tracing::debug!(
                    resource = resource_path,
                    "page and cursor boundary both supplied, using offset mode"
                );
            }
            tracing::debug!(resource = resource_path, mode = "offset", "paginating");
            let (rows, total) = repository.find_and_count(&query).await?;
            return Ok(Page::Offset(OffsetPage {
                data: rows.into_iter().map(T::from).collect(),
                total,
            }));
        }

        tracing::debug!(resource = resource_path, mode = "cursor", "paginating");
        let rows = repository.find(&query).await?;
        self.cursor_page::<T>(request, &query, rows, resource_path)
    }

    fn cursor_page<T: Paginated>(
        &self,
        request: &PaginationRequest,
        query: &QueryDescriptor<ColumnOf<T>>,
        rows: Vec<ModelOf<T>>,
        resource_path: &str,
    ) -> Result<Page<T>, ApiError> {
        let is_full = !rows.is_empty() && rows.len() as u64 == query.take;
        let last_id = match rows.last() {
            Some(last) if is_full => Some(row_id::<T>(last)?),
            _ => None,
        };

        let next = match last_id {
            Some(last_id) => {
                let base_url = self.config.base_url().map_err(|err| {
                    ApiError::internal(
                        "Failed to build cursor URL",
                        Some(format!("invalid base URL: {err}")),
                    )
                })?;
                let boundary = CursorBoundary {
                    id_field: T::ID_FIELD,
                    cursor_field: T::CURSOR_ORDER_FIELD,
                    direction: query
                        .direction_of(T::CURSOR_ORDER_FIELD)
                        .unwrap_or_default(),
                    last_id,
                };
                let url = build_next_url(&base_url, resource_path, request, &boundary).map_err(
                    |err| {
                        ApiError::internal(
                            "Failed to build cursor URL",
                            Some(format!("invalid resource path '{resource_path}': {err}")),
                        )
                    },
                )?;
                Some(url.to_string())
            }
            None => None,
        };

        let data: Vec<T> = rows.into_iter().map(T::from).collect();
        Ok(Page::Cursor(CursorPage {
            count: data.len(),
            data,
            cursor: CursorInfo { after: last_id },
            next,
        }))
    }
}

fn has_cursor_boundary<T: Paginated>(request: &PaginationRequest) -> bool {
    [Operator::MoreThan, Operator::LessThan]
        .into_iter()
        .any(|op| request.get(&operator_key(T::ID_FIELD, op.token())).is_some())
}

fn row_id<T: Paginated>(row: &ModelOf<T>) -> Result<i64, ApiError> {
    let value = row.get(T::ID_COLUMN);
    integer_value(&value).ok_or_else(|| {
        ApiError::internal(
            "Failed to build cursor",
            Some(format!(
                "identifier field '{}' is not an integer: {value:?}",
                T::ID_FIELD
            )),
        )
    })
}

/// `value` as an `i64`, for integer values that fit
#[must_use]
pub fn integer_value(value: &Value) -> Option<i64> {
    match *value {
        Value::TinyInt(Some(v)) => Some(v.into()),
        Value::SmallInt(Some(v)) => Some(v.into()),
        Value::Int(Some(v)) => Some(v.into()),
        Value::BigInt(Some(v)) => Some(v),
        Value::TinyUnsigned(Some(v)) => Some(v.into()),
        Value::SmallUnsigned(Some(v)) => Some(v.into()),
        Value::Unsigned(Some(v)) => Some(v.into()),
        Value::BigUnsigned(Some(v)) => i64::try_from(v).ok(),
        _ => None,
    }
}

/// Where the next cursor page starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBoundary<'a> {
    /// API name of the identifier field, e.g. `id`
    pub id_field: &'a str,
    /// API name of the cursor sort field, e.g. `createdAt`
    pub cursor_field: &'a str,
    /// Direction the cursor sort field was walked in
    pub direction: SortDirection,
    /// Identifier of the last row on the current page
    pub last_id: i64,
}

/// Build the URL of the next cursor page.
///
/// Query order: `take`, then `order__{cursor_field}` when the request did not
/// carry it, then every non-empty request parameter in arrival order, then the
/// boundary. Existing `where__{id_field}__more_than`/`__less_than` parameters
/// are dropped so exactly one boundary is emitted. `page` is never emitted.
///
/// # Errors
///
/// Fails when `resource_path` cannot be joined onto `base_url`.
pub fn build_next_url(
    base_url: &Url,
    resource_path: &str,
    request: &PaginationRequest,
    boundary: &CursorBoundary<'_>,
) -> Result<Url, url::ParseError> {
    let mut url = base_url.join(resource_path.trim_start_matches('/'))?;

    let more_than = operator_key(boundary.id_field, Operator::MoreThan.token());
    let less_than = operator_key(boundary.id_field, Operator::LessThan.token());
    let order = order_key(boundary.cursor_field);
    let boundary_key = match boundary.direction {
        SortDirection::Asc => &more_than,
        SortDirection::Desc => &less_than,
    };

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.append_pair("take", &request.take.to_string());
        if request.get(&order).is_none() {
            pairs.append_pair(&order, boundary.direction.as_str());
        }
        for (key, value) in request.params() {
            if value.is_empty() || key == more_than || key == less_than {
                continue;
            }
            pairs.append_pair(key, value);
        }
        pairs.append_pair(boundary_key, &boundary.last_id.to_string());
    }

    Ok(url)
}
