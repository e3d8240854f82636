#![allow(dead_code)]

use axum::Router;
use chrono::{TimeDelta, TimeZone, Utc};
use pagecrate::{
    PaginationConfig, Paginator,
    routes::{PaginationState, paginated_router},
};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::prelude::*;

pub mod post_entity;

pub use post_entity::Model as Post;

/// Origin the test app advertises in `next` URLs
pub const TEST_HOST: &str = "localhost:3000/api/v1";

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Database with `count` posts: ids `1..=count`, created one minute apart,
/// `likes = id * 10`, even ids published, first half by author 1.
pub async fn setup_seeded_db(count: i32) -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;
    for i in 1..=count {
        let title = if i % 2 == 1 {
            format!("Learning Rust {i}")
        } else {
            format!("Cooking pasta {i}")
        };
        let author_id = if i <= count / 2 { 1 } else { 2 };
        insert_post(&db, &title, i * 10, i % 2 == 0, author_id, i.into()).await?;
    }
    Ok(db)
}

pub async fn insert_post(
    db: &DatabaseConnection,
    title: &str,
    likes: i32,
    published: bool,
    author_id: i32,
    minutes: i64,
) -> Result<Post, DbErr> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    post_entity::ActiveModel {
        title: Set(title.to_string()),
        likes: Set(likes),
        published: Set(published),
        author_id: Set(author_id),
        created_at: Set(base + TimeDelta::minutes(minutes)),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub fn test_config() -> PaginationConfig {
    PaginationConfig {
        protocol: "http".to_string(),
        host: TEST_HOST.to_string(),
    }
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    let state = PaginationState::new(db, Paginator::new(test_config()));
    let api = paginated_router::<Post>().with_state(state);

    Router::new().nest("/api/v1", api)
}

/// Path and query of an absolute `next` URL, ready for `Request::uri`
pub fn path_and_query(next: &str) -> String {
    let url = url::Url::parse(next).unwrap();
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreatePostTable)]
    }
}

pub struct CreatePostTable;

#[async_trait::async_trait]
impl MigrationName for CreatePostTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_post_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreatePostTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(post_entity::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(post_entity::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(post_entity::Column::Title)
                    .string()
                    .not_null(),
            )
            .col(
                ColumnDef::new(post_entity::Column::Likes)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(post_entity::Column::Published)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(post_entity::Column::AuthorId)
                    .integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(post_entity::Column::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(post_entity::Entity).to_owned())
            .await?;
        Ok(())
    }
}
