use proc_macro2::TokenStream;
use proc_macro_error::abort;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Fields, FieldsNamed, Generics, ext::IdentExt, parse_quote};

use crate::serde_attrs::{SerdeAttrs, rename_field, rename_variant};

pub(crate) fn expand(input: &DeriveInput, crate_path: &TokenStream) -> TokenStream {
    let container = SerdeAttrs::parse(&input.attrs);
    let type_name = container
        .rename
        .clone()
        .unwrap_or_else(|| input.ident.unraw().to_string());

    let body = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => record(&type_name, fields, &container, crate_path),
            Fields::Unnamed(fields) => {
                let types: Vec<_> = fields.unnamed.iter().map(|f| &f.ty).collect();
                match types.as_slice() {
                    [] => quote!(#crate_path::TypeDescriptor::Null),
                    [inner] => quote!(<#inner as #crate_path::Describe>::describe()),
                    many => quote! {
                        #crate_path::TypeDescriptor::Sequence(::std::vec![
                            #( <#many as #crate_path::Describe>::describe() ),*
                        ])
                    },
                }
            }
            Fields::Unit => quote!(#crate_path::TypeDescriptor::Null),
        },
        Data::Enum(data) => match (&container.tag, &container.content) {
            _ if container.untagged => untagged(data, crate_path),
            (Some(tag), None) => internally_tagged(data, tag, &container, crate_path),
            (Some(tag), Some(content)) => {
                adjacently_tagged(data, tag, content, &container, crate_path)
            }
            (None, Some(_)) => abort!(input.ident, "`#[serde(content)]` requires `tag`"),
            (None, None) if data.variants.iter().all(|v| matches!(v.fields, Fields::Unit)) => {
                enumeration(&type_name, data, &container, crate_path)
            }
            (None, None) => externally_tagged(data, &container, crate_path),
        },
        Data::Union(_) => abort!(input.ident, "Describe cannot be derived for unions"),
    };

    let name = &input.ident;
    let generics = with_describe_bounds(&input.generics, crate_path);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics #crate_path::Describe for #name #ty_generics #where_clause {
            fn describe() -> #crate_path::TypeDescriptor {
                #body
            }
        }
    }
}

fn with_describe_bounds(generics: &Generics, crate_path: &TokenStream) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for ident in params {
        where_clause
            .predicates
            .push(parse_quote!(#ident: #crate_path::Describe));
    }
    generics
}

/// `.field(..)` calls for the named fields serde reads.
fn field_pushes(
    fields: &FieldsNamed,
    container: &SerdeAttrs,
    crate_path: &TokenStream,
) -> Vec<TokenStream> {
    let mut pushes = Vec::new();
    for field in &fields.named {
        let attrs = SerdeAttrs::parse(&field.attrs);
        if attrs.skip {
            continue;
        }
        if attrs.flatten {
            abort!(field, "Describe does not support `#[serde(flatten)]` fields");
        }

        let Some(ident) = &field.ident else {
            continue;
        };
        let ident = ident.unraw().to_string();
        let name = attrs
            .rename
            .or_else(|| {
                container
                    .rename_all
                    .as_deref()
                    .and_then(|rule| rename_field(rule, &ident))
            })
            .unwrap_or(ident);

        let ty = &field.ty;
        let describe = quote!(<#ty as #crate_path::Describe>::describe());
        pushes.push(if attrs.default || container.default {
            quote!(.field_with_default(#name, #describe))
        } else {
            quote!(.field(#name, #describe))
        });
    }
    pushes
}

fn record(
    type_name: &str,
    fields: &FieldsNamed,
    container: &SerdeAttrs,
    crate_path: &TokenStream,
) -> TokenStream {
    let pushes = field_pushes(fields, container, crate_path);
    quote! {
        #crate_path::TypeDescriptor::Record(
            #crate_path::RecordDescriptor::new(#type_name)
                #( #pushes )*
        )
    }
}

fn variant_name(variant: &syn::Variant, container: &SerdeAttrs) -> String {
    let attrs = SerdeAttrs::parse(&variant.attrs);
    let ident = variant.ident.unraw().to_string();
    attrs
        .rename
        .or_else(|| {
            container
                .rename_all
                .as_deref()
                .and_then(|rule| rename_variant(rule, &ident))
        })
        .unwrap_or(ident)
}

fn described_variants(data: &DataEnum) -> impl Iterator<Item = &syn::Variant> {
    data.variants
        .iter()
        .filter(|variant| !SerdeAttrs::parse(&variant.attrs).skip)
}

/// What a variant carries, or `None` for a unit variant.
fn payload(variant: &syn::Variant, name: &str, crate_path: &TokenStream) -> Option<TokenStream> {
    match &variant.fields {
        Fields::Unit => None,
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
            let ty = &fields.unnamed[0].ty;
            Some(quote!(<#ty as #crate_path::Describe>::describe()))
        }
        Fields::Unnamed(fields) => {
            let types = fields.unnamed.iter().map(|f| &f.ty);
            Some(quote! {
                #crate_path::TypeDescriptor::Sequence(::std::vec![
                    #( <#types as #crate_path::Describe>::describe() ),*
                ])
            })
        }
        Fields::Named(fields) => Some(record(
            name,
            fields,
            &SerdeAttrs::parse(&variant.attrs),
            crate_path,
        )),
    }
}

fn string_literals(values: &[String], crate_path: &TokenStream) -> TokenStream {
    quote! {
        #crate_path::TypeDescriptor::literals([
            #( #crate_path::LiteralValue::String(::std::string::String::from(#values)) ),*
        ])
    }
}

fn enumeration(
    type_name: &str,
    data: &DataEnum,
    container: &SerdeAttrs,
    crate_path: &TokenStream,
) -> TokenStream {
    let values: Vec<String> = described_variants(data)
        .map(|variant| variant_name(variant, container))
        .collect();

    quote! {
        #crate_path::TypeDescriptor::enumeration(
            #type_name,
            [#( #crate_path::LiteralValue::String(::std::string::String::from(#values)) ),*],
        )
    }
}

/// Default representation with data: unit variants travel as their name,
/// the rest as `{"<variant>": <payload>}`.
fn externally_tagged(
    data: &DataEnum,
    container: &SerdeAttrs,
    crate_path: &TokenStream,
) -> TokenStream {
    let mut units = Vec::new();
    let mut members = Vec::new();
    for variant in described_variants(data) {
        let name = variant_name(variant, container);
        match payload(variant, &name, crate_path) {
            None => units.push(name),
            Some(inner) => members.push(quote! {
                #crate_path::TypeDescriptor::Record(
                    #crate_path::RecordDescriptor::new(#name).field(#name, #inner)
                )
            }),
        }
    }
    if !units.is_empty() {
        members.insert(0, string_literals(&units, crate_path));
    }

    quote! {
        #crate_path::TypeDescriptor::union([#( #members ),*])
    }
}

/// `#[serde(tag = "..")]`: the tag sits beside the variant's own fields.
fn internally_tagged(
    data: &DataEnum,
    tag: &str,
    container: &SerdeAttrs,
    crate_path: &TokenStream,
) -> TokenStream {
    let members: Vec<TokenStream> = described_variants(data)
        .map(|variant| {
            let name = variant_name(variant, container);
            let tag_ty = string_literals(std::slice::from_ref(&name), crate_path);
            let pushes = match &variant.fields {
                Fields::Unit => Vec::new(),
                Fields::Named(fields) => {
                    field_pushes(fields, &SerdeAttrs::parse(&variant.attrs), crate_path)
                }
                Fields::Unnamed(_) => abort!(
                    variant,
                    "Describe supports only unit and struct variants in internally tagged enums"
                ),
            };
            quote! {
                #crate_path::TypeDescriptor::Record(
                    #crate_path::RecordDescriptor::new(#name)
                        .field(#tag, #tag_ty)
                        #( #pushes )*
                )
            }
        })
        .collect();

    quote! {
        #crate_path::TypeDescriptor::union([#( #members ),*])
    }
}

/// `#[serde(tag = "..", content = "..")]`: `{"<tag>": name, "<content>": payload}`.
fn adjacently_tagged(
    data: &DataEnum,
    tag: &str,
    content: &str,
    container: &SerdeAttrs,
    crate_path: &TokenStream,
) -> TokenStream {
    let members: Vec<TokenStream> = described_variants(data)
        .map(|variant| {
            let name = variant_name(variant, container);
            let tag_ty = string_literals(std::slice::from_ref(&name), crate_path);
            let content_field = payload(variant, &name, crate_path)
                .map(|inner| quote!(.field(#content, #inner)));
            quote! {
                #crate_path::TypeDescriptor::Record(
                    #crate_path::RecordDescriptor::new(#name)
                        .field(#tag, #tag_ty)
                        #content_field
                )
            }
        })
        .collect();

    quote! {
        #crate_path::TypeDescriptor::union([#( #members ),*])
    }
}

fn untagged(data: &DataEnum, crate_path: &TokenStream) -> TokenStream {
    let members: Vec<TokenStream> = described_variants(data)
        .map(|variant| {
            let name = variant.ident.unraw().to_string();
            payload(variant, &name, crate_path)
                .unwrap_or_else(|| quote!(#crate_path::TypeDescriptor::Null))
        })
        .collect();

    quote! {
        #crate_path::TypeDescriptor::union([#( #members ),*])
    }
}
