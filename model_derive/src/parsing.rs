//! Parsing utilities for schema, property and state attributes
//!
//! This module handles the parsing of `#[schema]`, `#[property]` and `#[state]`
//! attributes and validation of model names and property keys.

use syn::{
    ext::IdentExt, parse::Parse, parse::ParseStream, Attribute, Data, Error, Expr, Fields, Ident,
    LitStr, Meta, Result, Token,
};

/// Validate model name and return syn::Error for better proc macro error handling
pub fn validate_model_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid model name '{}': {}", name, e)))
}

/// Validate property key and return syn::Error for better proc macro error handling
pub fn validate_property_key_syn(key: &str, span: proc_macro2::Span) -> Result<()> {
    if key.is_empty() {
        return Err(Error::new(span, "Invalid property key: key cannot be empty"));
    }
    if key.len() > 255 {
        return Err(Error::new(
            span,
            format!("Invalid property key '{}': too long (max 255)", key),
        ));
    }
    if key.chars().any(char::is_control) {
        return Err(Error::new(
            span,
            format!("Invalid property key '{}': contains control characters", key),
        ));
    }
    Ok(())
}

/// Same rules as model_object::validation::ValidatedModelName, checked at compile time
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    Ok(())
}

/// `BookReview` -> `book_review`
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            out.push(c);
        }
    }
    out
}

#[derive(Debug)]
pub struct SchemaInfo {
    pub name: String,
    pub primary_key: Option<String>,
}

/// Arguments of `#[schema(...)]`, also accepted by `#[model(...)]`
#[derive(Debug, Default)]
pub struct SchemaArgs {
    pub name: Option<LitStr>,
    pub primary_key: Option<LitStr>,
    pub no_primary_key: bool,
}

impl Parse for SchemaArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = SchemaArgs::default();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            match key.to_string().as_str() {
                "name" => {
                    input.parse::<Token![=]>()?;
                    args.name = Some(input.parse()?);
                }
                "primary_key" => {
                    input.parse::<Token![=]>()?;
                    args.primary_key = Some(input.parse()?);
                }
                "no_primary_key" => args.no_primary_key = true,
                other => {
                    return Err(Error::new(
                        key.span(),
                        format!("Unknown schema option '{}': expected name, primary_key or no_primary_key", other),
                    ))
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        if args.primary_key.is_some() && args.no_primary_key {
            return Err(Error::new(
                input.span(),
                "primary_key and no_primary_key cannot be combined",
            ));
        }

        Ok(args)
    }
}

pub fn parse_schema_attributes(ident: &Ident, attrs: &[Attribute]) -> Result<SchemaInfo> {
    let mut args = SchemaArgs::default();
    for attr in attrs {
        if attr.path().is_ident("schema") {
            args = attr.parse_args()?;
        }
    }

    let (name, span) = match &args.name {
        Some(lit) => (lit.value(), lit.span()),
        None => (to_snake_case(&ident.to_string()), ident.span()),
    };
    validate_model_name_syn(&name, span)?;

    let primary_key = if args.no_primary_key {
        None
    } else {
        match &args.primary_key {
            Some(lit) => {
                validate_property_key_syn(&lit.value(), lit.span())?;
                Some(lit.value())
            }
            None => Some("id".to_string()),
        }
    };

    Ok(SchemaInfo { name, primary_key })
}

/// One `#[property(key: type | type = default, flags...)]` entry
pub struct PropertySpec {
    pub key: String,
    pub span: proc_macro2::Span,
    pub types: Vec<String>,
    pub default: Option<Expr>,
    pub nullable: bool,
    pub required: bool,
    pub required_on_save: bool,
    pub readonly: bool,
}

impl PropertySpec {
    /// A lone type with no flags is declared as shorthand (nullable)
    pub fn is_shorthand(&self) -> bool {
        self.types.len() == 1
            && !self.nullable
            && !self.required
            && !self.required_on_save
            && !self.readonly
    }
}

fn parse_name(input: ParseStream) -> Result<(String, proc_macro2::Span)> {
    if input.peek(LitStr) {
        let lit: LitStr = input.parse()?;
        Ok((lit.value(), lit.span()))
    } else {
        let ident = Ident::parse_any(input)?;
        Ok((ident.unraw().to_string(), ident.span()))
    }
}

impl Parse for PropertySpec {
    fn parse(input: ParseStream) -> Result<Self> {
        let (key, span) = parse_name(input)?;
        validate_property_key_syn(&key, span)?;
        input.parse::<Token![:]>()?;

        let mut spec = PropertySpec {
            key,
            span,
            types: Vec::new(),
            default: None,
            nullable: false,
            required: false,
            required_on_save: false,
            readonly: false,
        };

        loop {
            let (type_name, _) = parse_name(input)?;
            if type_name == "null" {
                spec.nullable = true;
            } else if !spec.types.contains(&type_name) {
                spec.types.push(type_name);
            }
            if !input.peek(Token![|]) {
                break;
            }
            input.parse::<Token![|]>()?;
        }
        if spec.types.is_empty() {
            return Err(Error::new(spec.span, "A property needs at least one non-null type"));
        }

        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            spec.default = Some(input.parse()?);
        }

        while input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let flag: Ident = input.parse()?;
            match flag.to_string().as_str() {
                "nullable" => spec.nullable = true,
                "required" => spec.required = true,
                "required_on_save" => spec.required_on_save = true,
                "readonly" => spec.readonly = true,
                other => {
                    return Err(Error::new(
                        flag.span(),
                        format!("Unknown property flag '{}'", other),
                    ))
                }
            }
        }

        if !input.is_empty() {
            return Err(input.error("expected `,` followed by a property flag"));
        }

        Ok(spec)
    }
}

pub fn parse_property_attributes(attrs: &[Attribute]) -> Result<Vec<PropertySpec>> {
    let mut properties: Vec<PropertySpec> = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("property") {
            continue;
        }
        let spec: PropertySpec = attr.parse_args()?;
        if properties.iter().any(|p| p.key == spec.key) {
            return Err(Error::new(
                spec.span,
                format!("Property '{}' is declared twice", spec.key),
            ));
        }
        properties.push(spec);
    }
    Ok(properties)
}

#[derive(Debug)]
pub struct FieldInfo {
    pub state_field: Ident,
    pub other_fields: Vec<Ident>,
}

pub fn parse_field_attributes(data: &Data) -> Result<FieldInfo> {
    if let Data::Struct(data_struct) = data {
        if let Fields::Named(fields_named) = &data_struct.fields {
            let mut marked = None;
            let mut fallback = None;
            let mut idents = Vec::new();

            for field in &fields_named.named {
                let field_name = field
                    .ident
                    .as_ref()
                    .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

                if has_attribute(&field.attrs, "state") {
                    if marked.is_some() {
                        return Err(Error::new_spanned(field, "Only one field can be marked #[state]"));
                    }
                    marked = Some(field_name.clone());
                } else if field_name == "state" {
                    fallback = Some(field_name.clone());
                }
                idents.push(field_name.clone());
            }

            let state_field = marked.or(fallback).ok_or_else(|| {
                Error::new(
                    proc_macro2::Span::call_site(),
                    "ModelSchema needs a ModelState field: name it `state` or mark it #[state]",
                )
            })?;
            let other_fields = idents.into_iter().filter(|i| *i != state_field).collect();

            return Ok(FieldInfo {
                state_field,
                other_fields,
            });
        }
    }

    Err(Error::new(
        proc_macro2::Span::call_site(),
        "ModelSchema can only be derived for structs with named fields",
    ))
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs
        .iter()
        .any(|attr| attr.path().is_ident(name) && matches!(attr.meta, Meta::Path(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, DeriveInput};

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("Product"), "product");
        assert_eq!(to_snake_case("BookReview"), "book_review");
        assert_eq!(to_snake_case("Item2Tag"), "item2_tag");
    }

    #[test]
    fn test_model_name_validation() {
        let span = proc_macro2::Span::call_site();
        assert!(validate_model_name_syn("book_review", span).is_ok());
        assert!(validate_model_name_syn("_private", span).is_ok());
        assert!(validate_model_name_syn("", span).is_err());
        assert!(validate_model_name_syn("9lives", span).is_err());
        assert!(validate_model_name_syn("book-review", span).is_err());
        assert!(validate_model_name_syn(&"a".repeat(64), span).is_err());
    }

    #[test]
    fn test_property_spec_parsing() {
        let spec: PropertySpec = syn::parse_str("price: float = 5.99").unwrap();
        assert_eq!(spec.key, "price");
        assert_eq!(spec.types, vec!["float"]);
        assert!(spec.default.is_some());
        assert!(spec.is_shorthand());

        let spec: PropertySpec = syn::parse_str("id: int | string | null, required, readonly").unwrap();
        assert_eq!(spec.types, vec!["int", "string"]);
        assert!(spec.nullable);
        assert!(spec.required);
        assert!(spec.readonly);
        assert!(!spec.is_shorthand());

        let spec: PropertySpec = syn::parse_str("\"display name\": string, required_on_save").unwrap();
        assert_eq!(spec.key, "display name");
        assert!(spec.required_on_save);

        let spec: PropertySpec = syn::parse_str("type: string").unwrap();
        assert_eq!(spec.key, "type");
    }

    #[test]
    fn test_property_spec_rejects_bad_input() {
        assert!(syn::parse_str::<PropertySpec>("name string").is_err());
        assert!(syn::parse_str::<PropertySpec>("name: string, sortable").is_err());
        assert!(syn::parse_str::<PropertySpec>("name: null").is_err());
        assert!(syn::parse_str::<PropertySpec>("\"\": string").is_err());
    }

    #[test]
    fn test_schema_attributes() {
        let input: DeriveInput = parse_quote! {
            #[schema(name = "catalog_item", primary_key = "sku")]
            struct Item { state: ModelState }
        };
        let info = parse_schema_attributes(&input.ident, &input.attrs).unwrap();
        assert_eq!(info.name, "catalog_item");
        assert_eq!(info.primary_key.as_deref(), Some("sku"));

        let input: DeriveInput = parse_quote! {
            #[schema(no_primary_key)]
            struct SettingEntry { state: ModelState }
        };
        let info = parse_schema_attributes(&input.ident, &input.attrs).unwrap();
        assert_eq!(info.name, "setting_entry");
        assert_eq!(info.primary_key, None);

        let input: DeriveInput = parse_quote! {
            #[schema(name = "bad-name")]
            struct Item { state: ModelState }
        };
        assert!(parse_schema_attributes(&input.ident, &input.attrs).is_err());
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let input: DeriveInput = parse_quote! {
            #[property(name: string)]
            #[property(name: int)]
            struct Item { state: ModelState }
        };
        assert!(parse_property_attributes(&input.attrs).is_err());
    }

    #[test]
    fn test_state_field_detection() {
        let input: DeriveInput = parse_quote! {
            struct Item { #[state] inner: ModelState, note: String }
        };
        let info = parse_field_attributes(&input.data).unwrap();
        assert_eq!(info.state_field, "inner");
        assert_eq!(info.other_fields.len(), 1);

        let input: DeriveInput = parse_quote! {
            struct Item { state: ModelState }
        };
        assert_eq!(parse_field_attributes(&input.data).unwrap().state_field, "state");

        let input: DeriveInput = parse_quote! {
            struct Item { inner: ModelState }
        };
        assert!(parse_field_attributes(&input.data).is_err());
    }
}
