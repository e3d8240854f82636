//! Repository seam between the pagination engine and storage.
//!
//! The engine only ever calls [`Repository::find`] (cursor mode) or
//! [`Repository::find_and_count`] (offset mode) with a composed
//! [`QueryDescriptor`]. [`EntityRepository`] runs those against any Sea-ORM
//! connection.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

use crate::models::QueryDescriptor;

#[async_trait]
pub trait Repository: Send + Sync {
    type Column: Send + Sync;
    type Row: Send;

    /// Rows matching `where`, ordered, limited by `take` and offset by `skip`
    async fn find(&self, query: &QueryDescriptor<Self::Column>) -> Result<Vec<Self::Row>, DbErr>;

    /// Same rows as [`find`](Self::find) plus the count of all rows matching `where`
    async fn find_and_count(
        &self,
        query: &QueryDescriptor<Self::Column>,
    ) -> Result<(Vec<Self::Row>, u64), DbErr>;
}

/// [`Repository`] over a Sea-ORM entity.
pub struct EntityRepository<'db, E, C> {
    db: &'db C,
    _entity: PhantomData<fn() -> E>,
}

impl<'db, E, C> EntityRepository<'db, E, C> {
    #[must_use]
    pub fn new(db: &'db C) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// AND of every filter in the query
#[must_use]
pub fn condition_of<C: ColumnTrait>(query: &QueryDescriptor<C>) -> Condition {
    query
        .filters
        .values()
        .fold(Condition::all(), |condition, filter| {
            condition.add(filter.predicate.to_expr(filter.column))
        })
}

/// Sea-ORM select for the whole query
#[must_use]
pub fn select_of<E: EntityTrait>(query: &QueryDescriptor<E::Column>) -> Select<E> {
    let mut select = E::find().filter(condition_of(query));
    for key in &query.order {
        select = select.order_by(key.column, key.direction.into());
    }
    select = select.limit(query.take);
    if let Some(skip) = query.skip {
        select = select.offset(skip);
    }
    select
}

#[async_trait]
impl<E, C> Repository for EntityRepository<'_, E, C>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    C: ConnectionTrait,
{
    type Column = E::Column;
    type Row = E::Model;

    async fn find(&self, query: &QueryDescriptor<E::Column>) -> Result<Vec<E::Model>, DbErr> {
        select_of::<E>(query).all(self.db).await
    }

    async fn find_and_count(
        &self,
        query: &QueryDescriptor<E::Column>,
    ) -> Result<(Vec<E::Model>, u64), DbErr> {
        let rows = select_of::<E>(query).all(self.db).await?;
        let total = PaginatorTrait::count(E::find().filter(condition_of(query)), self.db).await?;
        Ok((rows, total))
    }
}
