//! Paginated Blog Posts with Axum
//!
//! ```bash
//! cargo run --example blog_posts
//! ```
//!
//! Then try:
//! - **Cursor mode**: <http://localhost:3000/posts?take=2> and follow `next`
//! - **Offset mode**: <http://localhost:3000/posts?page=2&take=2>
//! - **Filters**: <http://localhost:3000/posts?where__title__i_like=rust&order__createdAt=DESC>
//! - **OpenAPI**: <http://localhost:3000/openapi.json>
//!
//! `PAGECRATE_HOST` and `PAGECRATE_PROTOCOL` (or a `pagecrate.toml`) set the origin used in `next` URLs.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{TimeDelta, Utc};
use pagecrate::{
    ApiError, CursorInfo, Page, PaginationConfig, PaginationQuery, PaginationRequest, Paginator,
    SortDirection,
    routes::{PaginationState, paginate_handler},
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};
use std::env;
use utoipa::OpenApi;

mod post {
    use pagecrate::Paginated;
    use sea_orm::entity::prelude::*;
    use serde::Serialize;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Paginated)]
    #[sea_orm(table_name = "posts")]
    #[pagecrate(cursor_order = "created_at")]
    #[serde(rename_all = "camelCase")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[pagecrate(filterable, sortable)]
        pub title: String,
        #[pagecrate(filterable, sortable)]
        pub likes: i32,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}
    impl ActiveModelBehavior for ActiveModel {}
}

/// List blog posts
#[utoipa::path(
    get,
    path = "/posts",
    params(PaginationQuery),
    responses(
        (status = 200, description = "A cursor page or an offset page of posts"),
        (status = 400, description = "The query string could not be used"),
    )
)]
async fn list_posts(
    state: State<PaginationState>,
    request: PaginationRequest,
) -> Result<Json<Page<post::Model>>, ApiError> {
    paginate_handler::<post::Model>(state, request).await
}

#[derive(OpenApi)]
#[openapi(paths(list_posts), components(schemas(CursorInfo, SortDirection)))]
struct ApiDoc;

async fn seed(db: &DatabaseConnection) -> Result<(), Box<dyn std::error::Error>> {
    db.execute(sea_orm::Statement::from_string(
        db.get_database_backend(),
        r"CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            title TEXT NOT NULL,
            likes INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );"
        .to_owned(),
    ))
    .await?;

    let titles = [
        "Learning Rust ownership",
        "Sourdough at home",
        "Async Rust in practice",
        "Cursor pagination explained",
        "Rust error handling",
    ];
    let start = Utc::now() - TimeDelta::days(30);
    for (day, (title, likes)) in titles.iter().zip([12, 3, 40, 25, 7]).enumerate() {
        post::ActiveModel {
            title: Set((*title).to_string()),
            likes: Set(likes),
            created_at: Set(start + TimeDelta::days(i64::try_from(day)?)),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let db: DatabaseConnection = Database::connect(&database_url).await?;
    seed(&db).await?;

    let config = PaginationConfig::load()?;
    let state = PaginationState::new(db, Paginator::new(config));

    let app = Router::new()
        .route("/posts", get(list_posts))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("🚀 API: http://0.0.0.0:3000/posts\n📖 OpenAPI: http://0.0.0.0:3000/openapi.json");
    axum::serve(listener, app).await?;
    Ok(())
}
