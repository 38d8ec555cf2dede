//! The subset of `#[serde(...)]` that changes a type's wire shape.

use syn::{Attribute, Expr, LitStr, Token, meta::ParseNestedMeta};

#[derive(Debug, Default)]
pub(crate) struct SerdeAttrs {
    pub rename: Option<String>,
    pub rename_all: Option<String>,
    pub default: bool,
    pub untagged: bool,
    pub tag: Option<String>,
    pub content: Option<String>,
    pub skip: bool,
    pub flatten: bool,
}

impl SerdeAttrs {
    /// Reads every `#[serde]` attribute in `attrs`. Keys that do not affect
    /// the shape are skipped; malformed ones are left for serde to report.
    pub(crate) fn parse(attrs: &[Attribute]) -> Self {
        let mut out = SerdeAttrs::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            let _ = attr.parse_nested_meta(|meta| out.visit(meta));
        }
        out
    }

    fn visit(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        let path = &meta.path;
        if path.is_ident("rename") {
            self.rename = deserialize_name(&meta)?.or(self.rename.take());
        } else if path.is_ident("rename_all") {
            self.rename_all = deserialize_name(&meta)?.or(self.rename_all.take());
        } else if path.is_ident("default") {
            self.default = true;
            skip_value(&meta)?;
        } else if path.is_ident("untagged") {
            self.untagged = true;
        } else if path.is_ident("tag") {
            self.tag = Some(meta.value()?.parse::<LitStr>()?.value());
        } else if path.is_ident("content") {
            self.content = Some(meta.value()?.parse::<LitStr>()?.value());
        } else if path.is_ident("skip") || path.is_ident("skip_deserializing") {
            self.skip = true;
        } else if path.is_ident("flatten") {
            self.flatten = true;
        } else {
            skip_value(&meta)?;
        }
        Ok(())
    }
}

/// `rename = "x"` or `rename(deserialize = "x")`.
fn deserialize_name(meta: &ParseNestedMeta<'_>) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        let name: LitStr = meta.value()?.parse()?;
        return Ok(Some(name.value()));
    }

    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("deserialize") {
            let value: LitStr = inner.value()?.parse()?;
            name = Some(value.value());
        } else {
            skip_value(&inner)?;
        }
        Ok(())
    })?;
    Ok(name)
}

fn skip_value(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_value(&inner))?;
    }
    Ok(())
}

/// Applies a `rename_all` rule to an enum variant (written in PascalCase).
pub(crate) fn rename_variant(rule: &str, variant: &str) -> Option<String> {
    let snake = || {
        let mut out = String::new();
        for (i, ch) in variant.char_indices() {
            if i > 0 && ch.is_uppercase() {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        }
        out
    };

    Some(match rule {
        "lowercase" => variant.to_ascii_lowercase(),
        "UPPERCASE" => variant.to_ascii_uppercase(),
        "PascalCase" => variant.to_owned(),
        "camelCase" => lower_first(variant),
        "snake_case" => snake(),
        "SCREAMING_SNAKE_CASE" => snake().to_ascii_uppercase(),
        "kebab-case" => snake().replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => snake().to_ascii_uppercase().replace('_', "-"),
        _ => return None,
    })
}

/// Applies a `rename_all` rule to a struct field (written in snake_case).
pub(crate) fn rename_field(rule: &str, field: &str) -> Option<String> {
    let pascal = || {
        let mut out = String::new();
        let mut capitalize = true;
        for ch in field.chars() {
            if ch == '_' {
                capitalize = true;
            } else if capitalize {
                out.push(ch.to_ascii_uppercase());
                capitalize = false;
            } else {
                out.push(ch);
            }
        }
        out
    };

    Some(match rule {
        "lowercase" | "snake_case" => field.to_owned(),
        "UPPERCASE" | "SCREAMING_SNAKE_CASE" => field.to_ascii_uppercase(),
        "PascalCase" => pascal(),
        "camelCase" => lower_first(&pascal()),
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.to_ascii_uppercase().replace('_', "-"),
        _ => return None,
    })
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{DeriveInput, parse_quote};

    #[test]
    fn test_container_and_field_attrs() {
        let input: DeriveInput = parse_quote! {
            #[derive(Deserialize)]
            #[serde(rename = "Trip", rename_all = "camelCase", default, deny_unknown_fields)]
            struct TripRequest {
                #[serde(rename(serialize = "out", deserialize = "origin_city"), with = "x")]
                origin: String,
                #[serde(skip)]
                cache: u8,
                #[serde(flatten)]
                extra: Extra,
            }
        };

        let container = SerdeAttrs::parse(&input.attrs);
        assert_eq!(container.rename.as_deref(), Some("Trip"));
        assert_eq!(container.rename_all.as_deref(), Some("camelCase"));
        assert!(container.default);
        assert!(!container.untagged);

        let syn::Data::Struct(data) = &input.data else {
            panic!("expected struct");
        };
        let fields: Vec<SerdeAttrs> = data
            .fields
            .iter()
            .map(|f| SerdeAttrs::parse(&f.attrs))
            .collect();
        assert_eq!(fields[0].rename.as_deref(), Some("origin_city"));
        assert!(fields[1].skip);
        assert!(fields[2].flatten);
    }

    #[test]
    fn test_enum_representation() {
        let internal: DeriveInput = parse_quote! {
            #[serde(tag = "kind", rename_all = "snake_case")]
            enum Seat { Window }
        };
        let attrs = SerdeAttrs::parse(&internal.attrs);
        assert_eq!(attrs.tag.as_deref(), Some("kind"));
        assert_eq!(attrs.content, None);

        let adjacent: DeriveInput = parse_quote! {
            #[serde(tag = "t", content = "c")]
            enum Budget { Amount(f64) }
        };
        let attrs = SerdeAttrs::parse(&adjacent.attrs);
        assert_eq!(attrs.tag.as_deref(), Some("t"));
        assert_eq!(attrs.content.as_deref(), Some("c"));
    }

    #[test]
    fn test_rename_rules() {
        assert_eq!(rename_variant("snake_case", "BusinessClass").unwrap(), "business_class");
        assert_eq!(rename_variant("lowercase", "BusinessClass").unwrap(), "businessclass");
        assert_eq!(rename_variant("kebab-case", "BusinessClass").unwrap(), "business-class");
        assert_eq!(rename_variant("camelCase", "BusinessClass").unwrap(), "businessClass");
        assert_eq!(
            rename_variant("SCREAMING_SNAKE_CASE", "BusinessClass").unwrap(),
            "BUSINESS_CLASS"
        );

        assert_eq!(rename_field("camelCase", "return_date").unwrap(), "returnDate");
        assert_eq!(rename_field("PascalCase", "return_date").unwrap(), "ReturnDate");
        assert_eq!(rename_field("kebab-case", "return_date").unwrap(), "return-date");
        assert_eq!(rename_field("lowercase", "return_date").unwrap(), "return_date");
        assert!(rename_field("Title Case", "x").is_none());
    }
}
