//! Derive macro for [`pagecrate`](https://docs.rs/pagecrate).
//!
//! `#[derive(Paginated)]` implements `pagecrate::traits::Paginated` for a Sea-ORM
//! `Model`, turning field attributes into the query-string whitelist.

mod attribute_parser;
mod code_generator;
mod structs;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Implements `Paginated` for a Sea-ORM model.
///
/// Struct attributes:
/// - `path = "posts"`: path segment for `next` URLs (defaults to `#[sea_orm(table_name)]`)
/// - `cursor_order = "created_at"`: sort field paired with the identifier for cursoring
///   (defaults to `created_at` when present, otherwise the identifier)
/// - `entity = "Entity"` and `column = "Column"`: Sea-ORM types, if not the usual names
///
/// Field attributes:
/// - `filterable`: allowed in `where__` keys
/// - `sortable`: allowed in `order__` keys
/// - `id`: the integer identifier (defaults to the field named `id`)
/// - `rename = "name"`: query-string name (defaults to lowerCamelCase)
///
/// ```rust,ignore
/// #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Paginated)]
/// #[sea_orm(table_name = "posts")]
/// #[pagecrate(cursor_order = "created_at")]
/// pub struct Model {
///     #[sea_orm(primary_key)]
///     pub id: i32,
///     #[pagecrate(filterable, sortable)]
///     pub title: String,
///     pub created_at: DateTimeWithTimeZone,
/// }
/// ```
#[proc_macro_derive(Paginated, attributes(pagecrate))]
pub fn derive_paginated(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    code_generator::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
