use heck::{ToLowerCamelCase, ToUpperCamelCase};
use syn::ext::IdentExt;

/// Struct-level `#[pagecrate(...)]` options
#[derive(Default)]
pub(crate) struct ResourceMeta {
    pub(crate) path: Option<String>,
    /// Rust name of the cursor sort field, e.g. `created_at`
    pub(crate) cursor_order: Option<syn::LitStr>,
    pub(crate) entity: Option<syn::Path>,
    pub(crate) column: Option<syn::Path>,
}

/// Field-level `#[pagecrate(...)]` options
#[derive(Default)]
pub(crate) struct FieldMeta {
    pub(crate) filterable: bool,
    pub(crate) sortable: bool,
    pub(crate) id: bool,
    pub(crate) rename: Option<String>,
}

/// A model field as the query string sees it
pub(crate) struct PaginatedField {
    pub(crate) ident: syn::Ident,
    /// Name used in `where__`/`order__` keys
    pub(crate) api_name: String,
    /// Sea-ORM `Column` variant
    pub(crate) variant: syn::Ident,
    pub(crate) meta: FieldMeta,
}

impl PaginatedField {
    pub(crate) fn new(ident: &syn::Ident, meta: FieldMeta) -> Self {
        let rust_name = ident.unraw().to_string();
        let api_name = meta
            .rename
            .clone()
            .unwrap_or_else(|| rust_name.to_lower_camel_case());
        let variant = syn::Ident::new(&rust_name.to_upper_camel_case(), ident.span());
        Self {
            ident: ident.clone(),
            api_name,
            variant,
            meta,
        }
    }

    pub(crate) fn is_named(&self, rust_name: &str) -> bool {
        self.ident.unraw() == rust_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;

    #[test]
    fn test_names_default_to_camel_case() {
        let field = PaginatedField::new(
            &syn::Ident::new("created_at", Span::call_site()),
            FieldMeta::default(),
        );
        assert_eq!(field.api_name, "createdAt");
        assert_eq!(field.variant.to_string(), "CreatedAt");
        assert!(field.is_named("created_at"));
    }

    #[test]
    fn test_rename_only_changes_api_name() {
        let field = PaginatedField::new(
            &syn::Ident::new("author_id", Span::call_site()),
            FieldMeta {
                rename: Some("author".to_string()),
                ..FieldMeta::default()
            },
        );
        assert_eq!(field.api_name, "author");
        assert_eq!(field.variant.to_string(), "AuthorId");
    }

    #[test]
    fn test_raw_identifier() {
        let field = PaginatedField::new(
            &syn::Ident::new_raw("type", Span::call_site()),
            FieldMeta::default(),
        );
        assert_eq!(field.api_name, "type");
        assert_eq!(field.variant.to_string(), "Type");
    }
}
