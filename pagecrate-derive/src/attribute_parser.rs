use syn::parse::Parser;
use syn::{Lit, LitStr, Meta, punctuated::Punctuated, token::Comma};

use crate::structs::{FieldMeta, ResourceMeta};

const ATTRIBUTE: &str = "pagecrate";

/// Parses struct-level `#[pagecrate(path = "...", cursor_order = "...", entity = "...", column = "...")]`.
pub(crate) fn parse_resource_meta(attrs: &[syn::Attribute]) -> syn::Result<ResourceMeta> {
    let mut meta = ResourceMeta::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("path") {
                meta.path = Some(nested.value()?.parse::<LitStr>()?.value());
            } else if nested.path.is_ident("cursor_order") {
                meta.cursor_order = Some(nested.value()?.parse::<LitStr>()?);
            } else if nested.path.is_ident("entity") {
                meta.entity = Some(nested.value()?.parse::<LitStr>()?.parse()?);
            } else if nested.path.is_ident("column") {
                meta.column = Some(nested.value()?.parse::<LitStr>()?.parse()?);
            } else {
                return Err(nested.error(
                    "unknown pagecrate attribute, expected `path`, `cursor_order`, `entity` or `column`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(meta)
}

/// Parses field-level `#[pagecrate(filterable, sortable, id, rename = "...")]`.
pub(crate) fn parse_field_meta(field: &syn::Field) -> syn::Result<FieldMeta> {
    let mut meta = FieldMeta::default();

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("filterable") {
                meta.filterable = true;
            } else if nested.path.is_ident("sortable") {
                meta.sortable = true;
            } else if nested.path.is_ident("id") {
                meta.id = true;
            } else if nested.path.is_ident("rename") {
                meta.rename = Some(nested.value()?.parse::<LitStr>()?.value());
            } else {
                return Err(nested.error(
                    "unknown pagecrate field attribute, expected `filterable`, `sortable`, `id` or `rename`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(meta)
}

/// Extracts the table name from Sea-ORM attributes.
/// Looks for `#[sea_orm(table_name = "...")]` attribute.
pub(crate) fn extract_table_name(attrs: &[syn::Attribute]) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident("sea_orm")
            && let Meta::List(meta_list) = &attr.meta
            && let Ok(metas) =
                Punctuated::<Meta, Comma>::parse_terminated.parse2(meta_list.tokens.clone())
        {
            for meta in metas {
                if let Meta::NameValue(nv) = meta
                    && nv.path.is_ident("table_name")
                    && let syn::Expr::Lit(expr_lit) = &nv.value
                    && let Lit::Str(s) = &expr_lit.lit
                {
                    return Some(s.value());
                }
            }
        }
    }
    None
}
