//! Procedural macros for declaring models
//!
//! This crate provides the `#[model]` macro and `ModelSchema` derive, which
//! generate the static schema (name, primary key, declared properties) and
//! the state accessors of a model struct.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod code_generation;
mod model_macro;
mod parsing;

use code_generation::generate_model_schema_impl;
use model_macro::model_attribute;
use parsing::{parse_field_attributes, parse_property_attributes, parse_schema_attributes};

/// Derive macro for the ModelSchema trait
///
/// The struct needs a `ModelState` field, named `state` or marked `#[state]`.
/// Any other field is filled with `Default::default()` on construction.
///
/// ```rust,ignore
/// #[derive(Debug, Clone, ModelSchema)]
/// #[schema(name = "product", primary_key = "id")]
/// #[property(id: int)]
/// #[property(name: string, required)]
/// #[property(price: float = 5.99)]
/// #[property(sku: string | null, required_on_save)]
/// pub struct Product {
///     state: ModelState,
/// }
/// ```
///
/// A property with one type and no flags is declared as shorthand, which
/// makes it nullable. `null` in the type list is the same as `nullable`.
#[proc_macro_derive(ModelSchema, attributes(schema, property, state))]
pub fn derive_model_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let schema_info = match parse_schema_attributes(name, &input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let properties = match parse_property_attributes(&input.attrs) {
        Ok(properties) => properties,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_info = match parse_field_attributes(&input.data) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    generate_model_schema_impl(name, &input.generics, &schema_info, &properties, &field_info).into()
}

/// Convenience attribute macro that adds the derives a model needs
///
/// ```rust,ignore
/// use modelhaus::prelude::*;
///
/// #[model(name = "user")]
/// #[property(id: int)]
/// #[property(email: string, required)]
/// pub struct User {
///     state: ModelState,
/// }
/// ```
#[proc_macro_attribute]
pub fn model(attr: TokenStream, item: TokenStream) -> TokenStream {
    model_attribute(attr, item)
}
