use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use crate::attribute_parser::{extract_table_name, parse_field_meta, parse_resource_meta};
use crate::structs::PaginatedField;

/// Default Rust name of the cursor sort field
const DEFAULT_CURSOR_FIELD: &str = "created_at";

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let meta = parse_resource_meta(&input.attrs)?;
    let fields = analyse_fields(input)?;

    let path = meta
        .path
        .clone()
        .or_else(|| extract_table_name(&input.attrs))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "missing resource path, add #[pagecrate(path = \"...\")] or #[sea_orm(table_name = \"...\")]",
            )
        })?;

    let id = identifier_field(input, &fields)?;
    let cursor = cursor_field(input, meta.cursor_order.as_ref(), &fields, id)?;

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let entity = meta
        .entity
        .map_or_else(|| quote! { Entity }, |entity| quote! { #entity });
    let column = meta
        .column
        .map_or_else(|| quote! { Column }, |column| quote! { #column });

    let id_name = &id.api_name;
    let id_variant = &id.variant;
    let cursor_name = &cursor.api_name;
    let cursor_variant = &cursor.variant;

    let filterable = std::iter::once(id).chain(
        fields
            .iter()
            .filter(|field| field.meta.filterable && !std::ptr::eq(*field, id)),
    );
    let (filter_names, filter_variants): (Vec<_>, Vec<_>) = filterable
        .map(|field| (&field.api_name, &field.variant))
        .unzip();

    let sortable = std::iter::once(cursor).chain(
        fields
            .iter()
            .filter(|field| field.meta.sortable && !std::ptr::eq(*field, cursor)),
    );
    let (sort_names, sort_variants): (Vec<_>, Vec<_>) = sortable
        .map(|field| (&field.api_name, &field.variant))
        .unzip();

    Ok(quote! {
        impl #impl_generics ::pagecrate::traits::Paginated for #ident #ty_generics #where_clause {
            type EntityType = #entity;

            const RESOURCE_PATH: &'static str = #path;
            const ID_FIELD: &'static str = #id_name;
            const ID_COLUMN: ::pagecrate::traits::ColumnOf<Self> = #column::#id_variant;
            const CURSOR_ORDER_FIELD: &'static str = #cursor_name;
            const CURSOR_ORDER_COLUMN: ::pagecrate::traits::ColumnOf<Self> = #column::#cursor_variant;

            fn filterable_columns() -> ::std::vec::Vec<(&'static str, ::pagecrate::traits::ColumnOf<Self>)> {
                ::std::vec![#((#filter_names, #column::#filter_variants)),*]
            }

            fn sortable_columns() -> ::std::vec::Vec<(&'static str, ::pagecrate::traits::ColumnOf<Self>)> {
                ::std::vec![#((#sort_names, #column::#sort_variants)),*]
            }
        }
    })
}

fn analyse_fields(input: &DeriveInput) -> syn::Result<Vec<PaginatedField>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Paginated can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "Paginated only supports structs with named fields",
        ));
    };

    named
        .named
        .iter()
        .map(|field| {
            let meta = parse_field_meta(field)?;
            // named fields always carry an ident
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
            Ok(PaginatedField::new(ident, meta))
        })
        .collect()
}

/// `#[pagecrate(id)]`, otherwise the field named `id`
fn identifier_field<'a>(
    input: &DeriveInput,
    fields: &'a [PaginatedField],
) -> syn::Result<&'a PaginatedField> {
    let mut marked = fields.iter().filter(|field| field.meta.id);
    match (marked.next(), marked.next()) {
        (Some(field), None) => Ok(field),
        (Some(_), Some(second)) => Err(syn::Error::new_spanned(
            &second.ident,
            "only one field can be marked #[pagecrate(id)]",
        )),
        (None, _) => fields
            .iter()
            .find(|field| field.is_named("id"))
            .ok_or_else(|| {
                syn::Error::new_spanned(
                    &input.ident,
                    "no identifier field, add a field named `id` or mark one with #[pagecrate(id)]",
                )
            }),
    }
}

/// `cursor_order = "..."`, otherwise `created_at` when present, otherwise the identifier
fn cursor_field<'a>(
    input: &DeriveInput,
    cursor_order: Option<&syn::LitStr>,
    fields: &'a [PaginatedField],
    id: &'a PaginatedField,
) -> syn::Result<&'a PaginatedField> {
    let Some(name) = cursor_order else {
        return Ok(fields
            .iter()
            .find(|field| field.is_named(DEFAULT_CURSOR_FIELD))
            .unwrap_or(id));
    };
    fields
        .iter()
        .find(|field| field.is_named(&name.value()))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                name,
                format!(
                    "cursor_order field `{}` does not exist on `{}`",
                    name.value(),
                    input.ident
                ),
            )
        })
}
