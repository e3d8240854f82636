use sea_orm::EntityTrait;
use serde::Serialize;

use crate::filtering::operators::OperatorRegistry;
use crate::models::FindOverrides;

/// Column type of a resource's entity
pub type ColumnOf<T> = <<T as Paginated>::EntityType as EntityTrait>::Column;
/// Model type of a resource's entity
pub type ModelOf<T> = <<T as Paginated>::EntityType as EntityTrait>::Model;

/// A resource that can be listed through the pagination engine.
///
/// The implementation is the field whitelist for query strings: only the
/// API names returned by [`filterable_columns`](Self::filterable_columns) may
/// appear in `where__` keys, and only those from
/// [`sortable_columns`](Self::sortable_columns) in `order__` keys. The
/// identifier field is always filterable and the cursor sort field is always
/// sortable, since cursor pages depend on both.
///
/// Usually generated with `#[derive(Paginated)]` on a Sea-ORM `Model`:
///
/// ```rust,ignore
/// #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Paginated)]
/// #[sea_orm(table_name = "posts")]
/// #[pagecrate(path = "posts", cursor_order = "created_at")]
/// pub struct Model {
///     #[sea_orm(primary_key)]
///     pub id: i32,
///     #[pagecrate(filterable, sortable)]
///     pub title: String,
///     #[pagecrate(filterable)]
///     pub likes: i32,
///     pub created_at: DateTimeWithTimeZone,
/// }
/// ```
pub trait Paginated: Serialize + Send + Sync
where
    Self: From<<Self::EntityType as EntityTrait>::Model>,
{
    type EntityType: EntityTrait;

    /// Path segment used when building `next` URLs, e.g. `posts`
    const RESOURCE_PATH: &'static str;

    /// API name of the integer row identifier
    const ID_FIELD: &'static str = "id";
    const ID_COLUMN: ColumnOf<Self>;

    /// API name of the sort key that pairs with the identifier for cursoring.
    /// Sorted ascending when the request does not say otherwise.
    const CURSOR_ORDER_FIELD: &'static str;
    const CURSOR_ORDER_COLUMN: ColumnOf<Self>;

    #[must_use]
    fn filterable_columns() -> Vec<(&'static str, ColumnOf<Self>)> {
        vec![(Self::ID_FIELD, Self::ID_COLUMN)]
    }

    #[must_use]
    fn sortable_columns() -> Vec<(&'static str, ColumnOf<Self>)> {
        vec![(Self::CURSOR_ORDER_FIELD, Self::CURSOR_ORDER_COLUMN)]
    }

    /// Operators accepted in `where__field__operator` keys
    #[must_use]
    fn operators() -> OperatorRegistry {
        OperatorRegistry::default()
    }

    /// Options applied on top of every composed query for this resource
    #[must_use]
    fn default_overrides() -> FindOverrides<ColumnOf<Self>> {
        FindOverrides::new()
    }

    /// Column for a `where__` field, if whitelisted
    #[must_use]
    fn filter_column(field: &str) -> Option<ColumnOf<Self>> {
        if field == Self::ID_FIELD {
            return Some(Self::ID_COLUMN);
        }
        Self::filterable_columns()
            .into_iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| column)
    }

    /// Column for an `order__` field, if whitelisted
    #[must_use]
    fn sort_column(field: &str) -> Option<ColumnOf<Self>> {
        if field == Self::CURSOR_ORDER_FIELD {
            return Some(Self::CURSOR_ORDER_COLUMN);
        }
        Self::sortable_columns()
            .into_iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| column)
    }
}
