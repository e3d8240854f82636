use std::collections::BTreeMap;

use crate::errors::PaginationError;
use crate::filtering::key::{FilterKey, parse_key};
use crate::filtering::operators::{FieldKind, Operator};
use crate::models::{MAX_PAGINATION_VALUE, PaginationRequest, QueryDescriptor, SortDirection};
use crate::traits::{ColumnOf, Paginated};

/// Turn a request into a query for resource `T`.
///
/// - `where__field` becomes an exact match on the whitelisted column
/// - `where__` keys with an empty value are validated but add no filter, matching
///   the `next` URL, which does not carry them
/// - `where__field__op` goes through `T::operators()`
/// - `order__field` must be `ASC` or `DESC`
/// - the cursor sort field is always present in the order, ascending by default
/// - `skip` is `(page - 1) * take` in offset mode and `None` otherwise
///
/// Pure: nothing is executed and the request is not modified.
///
/// # Errors
///
/// Any malformed key, unknown field or operator, bad arity, bad value or bad
/// sort direction fails the whole composition.
pub fn compose<T: Paginated>(
    request: &PaginationRequest,
) -> Result<QueryDescriptor<ColumnOf<T>>, PaginationError> {
    let registry = T::operators();
    let mut query = QueryDescriptor {
        filters: BTreeMap::new(),
        order: Vec::new(),
        take: request.take,
        skip: None,
    };
    query.set_order(T::CURSOR_ORDER_FIELD, T::CURSOR_ORDER_COLUMN, SortDirection::Asc);

    for (key, value) in request.params() {
        let Some(parsed) = parse_key(key)? else {
            continue;
        };
        tracing::trace!(key = %key, value = %value, "parsing pagination parameter");

        match parsed {
            FilterKey::Exact { field } => {
                let column = filter_column::<T>(key, field)?;
                if value.is_empty() {
                    continue;
                }
                let predicate = Operator::Equal.build(key, FieldKind::of_column(column), value)?;
                query.set_filter(field, column, predicate);
            }
            FilterKey::Operator { field, operator } => {
                let column = filter_column::<T>(key, field)?;
                let operator = registry.resolve(key, operator)?;
                if value.is_empty() {
                    continue;
                }
                let predicate = operator.build(key, FieldKind::of_column(column), value)?;
                query.set_filter(field, column, predicate);
            }
            FilterKey::Order { field } => {
                let column = T::sort_column(field).ok_or_else(|| PaginationError::UnknownField {
                    key: key.to_string(),
                    field: field.to_string(),
                })?;
                let direction = SortDirection::parse(value).ok_or_else(|| {
                    PaginationError::InvalidSortDirection {
                        key: key.to_string(),
                        value: value.to_string(),
                    }
                })?;
                query.set_order(field, column, direction);
            }
        }
    }

    if let Some(page) = request.page.filter(|page| *page > 0) {
        let skip = (page - 1)
            .checked_mul(request.take)
            .filter(|skip| *skip <= MAX_PAGINATION_VALUE)
            .ok_or_else(|| PaginationError::InvalidPaginationParameter {
                name: "page",
                value: page.to_string(),
            })?;
        query.skip = Some(skip);
    }

    tracing::debug!(
        resource = T::RESOURCE_PATH,
        filters = query.filters.len(),
        order = query.order.len(),
        take = query.take,
        skip = ?query.skip,
        "composed pagination query"
    );

    Ok(query)
}

fn filter_column<T: Paginated>(key: &str, field: &str) -> Result<ColumnOf<T>, PaginationError> {
    T::filter_column(field).ok_or_else(|| PaginationError::UnknownField {
        key: key.to_string(),
        field: field.to_string(),
    })
}
