//! Procedural macros for **fntool**
#![forbid(unsafe_code)]

mod describe;
mod serde_attrs;

use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro_error::{abort, proc_macro_error};
use quote::{format_ident, quote};
use syn::{
    Attribute, DeriveInput, Expr, ExprLit, ExprUnary, FnArg, ItemFn, Lit, LitStr, Meta, Pat,
    PatIdent, PatType, ReturnType, Token, Type, TypePath, UnOp, ext::IdentExt,
    parse_macro_input, punctuated::Punctuated,
};

// ============================================================================
// DESCRIBE DERIVE MACRO
// ============================================================================

/// Derives `Describe` from a type's shape and its serde attributes.
///
/// Named structs become records, unit-only enums become enumerations of
/// their serialized names, `#[serde(untagged)]` enums become unions and
/// newtypes describe their inner type.
#[proc_macro_error]
#[proc_macro_derive(Describe, attributes(serde))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    TokenStream::from(describe::expand(&input, &get_crate_path()))
}

/// Path to the runtime crate from the caller's point of view. Callers may
/// depend on the core crate directly or only on the `fntool` facade.
pub(crate) fn get_crate_path() -> proc_macro2::TokenStream {
    for candidate in ["fntool_core", "fntool"] {
        match crate_name(candidate) {
            Ok(FoundCrate::Itself) => return quote!(crate),
            Ok(FoundCrate::Name(name)) => {
                let ident = Ident::new(&name, Span::call_site());
                return quote!(::#ident);
            }
            Err(_) => continue,
        }
    }
    quote!(::fntool)
}

pub(crate) fn is_option_type(ty: &Type) -> bool {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return false;
    };

    let Some(last) = path.segments.last() else {
        return false;
    };
    if last.ident != "Option" {
        return false;
    }

    match path
        .segments
        .iter()
        .map(|s| &s.ident)
        .collect::<Vec<_>>()
        .as_slice()
    {
        // `Option`
        [ident] if *ident == "Option" => true,

        // `std::option::Option` or `core::option::Option`
        [first, second, ident]
            if (*first == "std" || *first == "core")
                && *second == "option"
                && *ident == "Option" =>
        {
            true
        }

        _ => false,
    }
}

fn is_result_type(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(TypePath { path, .. }) = &**ty else {
        return false;
    };
    path.segments
        .last()
        .is_some_and(|segment| segment.ident == "Result")
}

// ============================================================================
// TOOL ATTRIBUTE MACRO
// ============================================================================

/// Gather `///` doc-comments into one string. Only the single space rustdoc
/// leaves after `///` is removed, so indented `Args:` blocks survive.
fn docs(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|a| match &a.meta {
            Meta::NameValue(nv) if a.path().is_ident("doc") => {
                if let Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) = &nv.value
                {
                    let line = s.value();
                    Some(line.strip_prefix(' ').unwrap_or(&line).to_owned())
                } else {
                    None
                }
            }
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Default)]
struct ToolArgs {
    name: Option<LitStr>,
    description: Option<LitStr>,
}

struct Param {
    ident: Ident,
    ty: Type,
    default: Option<Expr>,
    one_of: Option<Vec<proc_macro2::TokenStream>>,
}

/// `#[one_of(...)]` accepts string, integer, float and boolean literals.
fn literal_value(expr: &Expr, crate_path: &proc_macro2::TokenStream) -> proc_macro2::TokenStream {
    let (negative, lit) = match expr {
        Expr::Lit(ExprLit { lit, .. }) => (false, lit),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => match &**expr {
            Expr::Lit(ExprLit { lit, .. }) => (true, lit),
            _ => abort!(expr, "`#[one_of]` values must be literals"),
        },
        _ => abort!(expr, "`#[one_of]` values must be literals"),
    };

    match lit {
        Lit::Str(s) if !negative => {
            quote!(#crate_path::LiteralValue::String(::std::string::String::from(#s)))
        }
        Lit::Bool(b) if !negative => quote!(#crate_path::LiteralValue::Bool(#b)),
        Lit::Int(i) => match i.base10_parse::<i64>() {
            Ok(value) => {
                let value = if negative { -value } else { value };
                quote!(#crate_path::LiteralValue::Integer(#value))
            }
            Err(err) => abort!(i, "{}", err),
        },
        Lit::Float(f) => match f.base10_parse::<f64>() {
            Ok(value) => {
                let value = if negative { -value } else { value };
                quote!(#crate_path::LiteralValue::Float(#value))
            }
            Err(err) => abort!(f, "{}", err),
        },
        other => abort!(other, "unsupported `#[one_of]` literal"),
    }
}

/// Reads and strips the parameter attributes `#[tool]` understands.
fn parse_param(arg: &mut FnArg, crate_path: &proc_macro2::TokenStream) -> Param {
    let FnArg::Typed(PatType { pat, ty, attrs, .. }) = arg else {
        abort!(arg, "`#[tool]` may not be used on `self` methods");
    };
    let Pat::Ident(PatIdent { ident, .. }) = &**pat else {
        abort!(pat, "`#[tool]` supports only identifier patterns");
    };

    let mut default = None;
    let mut one_of = None;
    for attr in attrs.iter() {
        if attr.path().is_ident("default") {
            match attr.parse_args::<Expr>() {
                Ok(expr) => default = Some(expr),
                Err(err) => abort!(attr, "`#[default(...)]` requires an expression: {}", err),
            }
        } else if attr.path().is_ident("one_of") {
            match attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
                Ok(values) => {
                    one_of = Some(
                        values
                            .iter()
                            .map(|value| literal_value(value, crate_path))
                            .collect(),
                    )
                }
                Err(err) => abort!(attr, "`#[one_of(...)]` requires literals: {}", err),
            }
        }
    }
    attrs.retain(|attr| !attr.path().is_ident("default") && !attr.path().is_ident("one_of"));

    Param {
        ident: ident.clone(),
        ty: (**ty).clone(),
        default,
        one_of,
    }
}

/// Exposes a function as a tool.
///
/// The function's doc comment supplies the description and, through an
/// `Args:` section or `:param` lines, the parameter descriptions.
/// Parameters may carry `#[default(expr)]` (the argument becomes optional
/// and `expr` fills it in) or `#[one_of(...)]` (the argument is restricted
/// to the listed literals). `#[tool(name = "...", description = "...")]`
/// overrides what introspection finds.
#[proc_macro_error]
#[proc_macro_attribute]
pub fn tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    // ───────── Parse attribute arguments ─────────
    let mut args = ToolArgs::default();
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            args.name = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("description") {
            args.description = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported tool property, expected `name` or `description`"))
        }
    });
    parse_macro_input!(attr with parser);

    // ───────── Parse the user function ─────────
    let mut func: ItemFn = parse_macro_input!(item);
    if !func.sig.generics.params.is_empty() {
        abort!(func.sig.generics, "`#[tool]` functions cannot be generic");
    }

    let crate_path = get_crate_path();
    let fn_name = func.sig.ident.clone();
    let fn_name_str = fn_name.unraw().to_string();
    let tool_name = args
        .name
        .as_ref()
        .map(LitStr::value)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fn_name_str.clone());
    let doc_lit = LitStr::new(&docs(&func.attrs), Span::call_site());

    let params: Vec<Param> = func
        .sig
        .inputs
        .iter_mut()
        .map(|arg| parse_param(arg, &crate_path))
        .collect();

    // ───────── Generated helper idents ─────────
    let wrapper_ident = format_ident!("__FntoolArgs_{}", fn_name_str);
    let descriptor_fn = format_ident!("__fntool_descriptor_{}", fn_name_str);
    let options_fn = format_ident!("__fntool_options_{}", fn_name_str);
    let call_fn = format_ident!("__fntool_call_{}", fn_name_str);
    let serde_path = LitStr::new(
        &quote!(#crate_path::serde).to_string().replace(' ', ""),
        Span::call_site(),
    );

    // ───────── Wrapper struct fields and defaults ─────────
    let mut fields = Vec::new();
    let mut default_fns = Vec::new();
    let mut param_descriptors = Vec::new();
    for param in &params {
        let Param {
            ident,
            ty,
            default,
            one_of,
        } = param;
        let name = ident.unraw().to_string();

        let described = match one_of {
            Some(values) => {
                let literals = quote!(#crate_path::TypeDescriptor::literals([#(#values),*]));
                if is_option_type(ty) {
                    quote!(#crate_path::TypeDescriptor::optional(#literals))
                } else {
                    literals
                }
            }
            None => quote!(<#ty as #crate_path::Describe>::describe()),
        };

        match default {
            Some(expr) => {
                let default_fn = format_ident!("__fntool_default_{}_{}", fn_name_str, name);
                let default_fn_str = LitStr::new(&default_fn.to_string(), Span::call_site());
                default_fns.push(quote! {
                    #[doc(hidden)]
                    fn #default_fn() -> #ty { #expr }
                });
                fields.push(quote! {
                    #[serde(default = #default_fn_str)]
                    #ident: #ty
                });
                param_descriptors.push(quote! {
                    #crate_path::ParamDescriptor::new(#name, #described)
                        .with_default(#crate_path::serde_json::json!(#default_fn()))
                });
            }
            None => {
                fields.push(quote!(#ident: #ty));
                param_descriptors.push(quote! {
                    #crate_path::ParamDescriptor::new(#name, #described)
                });
            }
        }
    }

    let idents: Vec<&Ident> = params.iter().map(|p| &p.ident).collect();
    let await_call = if func.sig.asyncness.is_some() {
        quote!(#fn_name( #( args.#idents ),* ).await)
    } else {
        quote!(#fn_name( #( args.#idents ),* ))
    };
    let unwrap_result = if is_result_type(&func.sig.output) {
        quote! {
            let out = out.map_err(|e| #crate_path::ToolError::Runtime(e.to_string()))?;
        }
    } else {
        quote!()
    };

    let name_override = args
        .name
        .as_ref()
        .map(|name| quote!(.with_name(#name)));
    let description_override = args
        .description
        .as_ref()
        .map(|description| quote!(.with_description(#description)));

    // ───────── Macro expansion ─────────
    TokenStream::from(quote! {
        #func

        #[allow(non_camel_case_types)]
        #[derive(#crate_path::serde::Deserialize)]
        #[serde(crate = #serde_path)]
        #[doc(hidden)]
        struct #wrapper_ident { #( #fields ),* }

        #( #default_fns )*

        #[doc(hidden)]
        fn #descriptor_fn() -> #crate_path::FunctionDescriptor {
            #crate_path::FunctionDescriptor::new(#fn_name_str)
                .doc(#doc_lit)
                #( .push_param(#param_descriptors) )*
        }

        #[doc(hidden)]
        fn #options_fn() -> #crate_path::CompileOptions {
            #crate_path::CompileOptions::new()
                #name_override
                #description_override
        }

        #[doc(hidden)]
        #[allow(unused_variables)]
        fn #call_fn(
            raw: #crate_path::serde_json::Value,
        ) -> #crate_path::futures::future::BoxFuture<
            'static,
            ::std::result::Result<#crate_path::serde_json::Value, #crate_path::ToolError>,
        > {
            ::std::boxed::Box::pin(async move {
                // Models send `{}` or nothing at all for parameterless calls.
                let raw = if raw.is_null() {
                    #crate_path::serde_json::Value::Object(::std::default::Default::default())
                } else {
                    raw
                };
                let args: #wrapper_ident = #crate_path::serde_json::from_value(raw)
                    .map_err(#crate_path::DeserializationError::from)?;
                let out = #await_call;
                #unwrap_result
                #crate_path::serde_json::to_value(out)
                    .map_err(|e| #crate_path::ToolError::Runtime(e.to_string()))
            })
        }

        #crate_path::inventory::submit! {
            #crate_path::ToolRegistration::new(
                #tool_name,
                #descriptor_fn,
                #options_fn,
                #call_fn,
            )
        }
    })
}
