use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::request::Parts,
    routing::get,
};
use sea_orm::DatabaseConnection;

use crate::errors::ApiError;
use crate::models::{FindOverrides, Page, PaginationRequest};
use crate::pagination::Paginator;
use crate::repository::EntityRepository;
use crate::traits::{ModelOf, Paginated};

/// Shared state for paginated list routes
#[derive(Clone)]
pub struct PaginationState {
    pub db: DatabaseConnection,
    pub paginator: Arc<Paginator>,
}

impl PaginationState {
    #[must_use]
    pub fn new(db: DatabaseConnection, paginator: Paginator) -> Self {
        Self {
            db,
            paginator: Arc::new(paginator),
        }
    }
}

impl<S> FromRequestParts<S> for PaginationRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request = Self::from_query(parts.uri.query().unwrap_or_default())?;
        Ok(request)
    }
}

/// List resource `T` with the query-string pagination contract.
///
/// # Errors
///
/// 400 for unusable pagination input, 500 for database or URL failures.
pub async fn paginate_handler<T>(
    State(state): State<PaginationState>,
    request: PaginationRequest,
) -> Result<Json<Page<T>>, ApiError>
where
    T: Paginated + 'static,
    ModelOf<T>: Sync + 'static,
{
    let repository = EntityRepository::<T::EntityType, _>::new(&state.db);
    let page = state
        .paginator
        .paginate::<T, _>(&request, &repository, FindOverrides::new(), T::RESOURCE_PATH)
        .await?;
    Ok(Json(page))
}

/// Router with [`paginate_handler`] mounted at `/{RESOURCE_PATH}`
#[must_use]
pub fn paginated_router<T>() -> Router<PaginationState>
where
    T: Paginated + 'static,
    ModelOf<T>: Sync + 'static,
{
    let path = format!("/{}", T::RESOURCE_PATH.trim_start_matches('/'));
    Router::new().route(&path, get(paginate_handler::<T>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn extract(uri: &str) -> Result<PaginationRequest, ApiError> {
        let (mut parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        PaginationRequest::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extractor_reads_query() {
        let request = extract("/posts?take=3&where__title=hello%20world")
            .await
            .unwrap();
        assert_eq!(request.take, 3);
        assert_eq!(request.get("where__title"), Some("hello world"));
    }

    #[tokio::test]
    async fn test_extractor_without_query_uses_defaults() {
        let request = extract("/posts").await.unwrap();
        assert_eq!(request, PaginationRequest::default());
    }

    #[tokio::test]
    async fn test_extractor_rejects_bad_take() {
        let err = extract("/posts?take=0").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
