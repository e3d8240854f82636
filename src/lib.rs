//! # pagecrate
//!
//! Cursor and offset pagination for Axum + Sea-ORM list endpoints, driven by a
//! small query-string language:
//!
//! ```text
//! GET /posts?take=2&order__createdAt=ASC&where__likes__more_than=10
//! ```
//!
//! - `page` present and non-zero selects **offset mode** (`{ data, total }`)
//! - otherwise **cursor mode** (`{ data, cursor: { after }, count, next }`), where
//!   `next` is the absolute URL of the following page or `null` after a short page
//!
//! Resources opt in with [`Paginated`], normally derived:
//!
//! ```rust,ignore
//! use pagecrate::{Paginated, PaginationConfig, Paginator, routes::{PaginationState, paginated_router}};
//!
//! #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Paginated)]
//! #[sea_orm(table_name = "posts")]
//! #[pagecrate(path = "posts", cursor_order = "created_at")]
//! pub struct Model {
//!     #[sea_orm(primary_key)]
//!     pub id: i32,
//!     #[pagecrate(filterable, sortable)]
//!     pub title: String,
//!     pub created_at: DateTimeWithTimeZone,
//! }
//!
//! let state = PaginationState::new(db, Paginator::new(PaginationConfig::load()?));
//! let app = paginated_router::<post::Model>().with_state(state);
//! ```

pub mod config;
pub mod errors;
pub mod filtering;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod traits;

pub use config::PaginationConfig;
pub use errors::{ApiError, PaginationError};
pub use models::{
    CursorInfo, CursorPage, DEFAULT_TAKE, FindOverrides, MAX_PAGINATION_VALUE, OffsetPage, Page,
    PaginationQuery, PaginationRequest, QueryDescriptor, SortDirection, SortKey,
};
pub use pagination::{CursorBoundary, Paginator, build_next_url};
pub use repository::{EntityRepository, Repository};
pub use traits::Paginated;

#[cfg(feature = "derive")]
pub use pagecrate_derive::Paginated;
