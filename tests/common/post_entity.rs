use pagecrate::Paginated;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Paginated)]
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
    #[pagecrate(filterable)]
    pub published: bool,
    #[pagecrate(filterable, rename = "author")]
    pub author_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
