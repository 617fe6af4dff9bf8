//! # mapbin derive macros
//!
//! Provides `#[derive(Describe)]`, which implements mapbin's `Describe`
//! trait for a struct by describing every field in declaration order -
//! the field order *is* the on-disk layout, so reordering fields changes
//! the format.
//!
//! Fields marked `#[mapbin(skip)]` take no part in serialization and keep
//! whatever value the surrounding constructor gave them on read.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Index};

/// Derives `mapbin::Describe` for a struct.
#[proc_macro_derive(Describe, attributes(mapbin))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    // Only structs carry a positional field layout.
    let data_struct = match input.data {
        Data::Struct(ds) => ds,
        _ => {
            return syn::Error::new(name.span(), "Describe can only be derived for structs")
                .to_compile_error()
                .into()
        }
    };

    let mut field_stmts = Vec::new();
    match data_struct.fields {
        Fields::Named(fields) => {
            for field in fields.named {
                let skip = match parse_attributes(&field.attrs) {
                    Ok(skip) => skip,
                    Err(e) => return e.to_compile_error().into(),
                };
                if skip {
                    continue;
                }
                let ident = field.ident;
                field_stmts.push(quote! {
                    mapbin::Describe::describe(&mut self.#ident, ar)?;
                });
            }
        }
        Fields::Unnamed(fields) => {
            for (i, field) in fields.unnamed.into_iter().enumerate() {
                let skip = match parse_attributes(&field.attrs) {
                    Ok(skip) => skip,
                    Err(e) => return e.to_compile_error().into(),
                };
                if skip {
                    continue;
                }
                let idx = Index::from(i);
                field_stmts.push(quote! {
                    mapbin::Describe::describe(&mut self.#idx, ar)?;
                });
            }
        }
        Fields::Unit => {}
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Underscore the archive parameter when every field is skipped, so the
    // generated impl compiles warning-free.
    let ar_param = if field_stmts.is_empty() {
        quote! { _ar }
    } else {
        quote! { ar }
    };

    let expanded = quote! {
        impl #impl_generics mapbin::Describe for #name #ty_generics #where_clause {
            fn describe<MapbinArchive: mapbin::Archive>(
                &mut self,
                #ar_param: &mut MapbinArchive,
            ) -> mapbin::Result<()> {
                #(#field_stmts)*
                Ok(())
            }
        }
    };

    TokenStream::from(expanded)
}

/// Parses `#[mapbin(...)]` attributes. Returns whether the field is skipped.
fn parse_attributes(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut skip = false;
    for attr in attrs {
        if attr.path().is_ident("mapbin") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    return Ok(());
                }
                Err(meta.error("unknown mapbin attribute key; supported: `skip`"))
            })?;
        }
    }
    Ok(skip)
}
