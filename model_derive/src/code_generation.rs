//! Code generation for `ModelSchema` implementations
//!
//! Turns the parsed schema, property and field metadata into the trait
//! implementation. Generated paths go through `model_object::`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Ident};

use crate::parsing::{FieldInfo, PropertySpec, SchemaInfo};

/// Declaration expression for one property
fn property_declaration(spec: &PropertySpec) -> TokenStream {
    if spec.is_shorthand() {
        let type_name = &spec.types[0];
        return match &spec.default {
            Some(default) => quote! {
                model_object::PropertyDeclaration::from((#type_name, #default))
            },
            None => quote! {
                model_object::PropertyDeclaration::from(#type_name)
            },
        };
    }

    let types = &spec.types;
    let mut chain = quote! {
        model_object::PropertyDefinition::new().types([#(#types),*])?
    };
    if spec.nullable {
        chain = quote! { #chain.nullable()? };
    }
    if spec.required {
        chain = quote! { #chain.required()? };
    }
    if spec.required_on_save {
        chain = quote! { #chain.required_on_save()? };
    }
    if spec.readonly {
        chain = quote! { #chain.readonly()? };
    }
    if let Some(default) = &spec.default {
        chain = quote! { #chain.default_value(#default)? };
    }

    quote! { model_object::PropertyDeclaration::from(#chain) }
}

pub fn generate_model_schema_impl(
    name: &Ident,
    generics: &Generics,
    schema_info: &SchemaInfo,
    properties: &[PropertySpec],
    field_info: &FieldInfo,
) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let model_name = &schema_info.name;

    let primary_key = match &schema_info.primary_key {
        Some(key) => quote! { Some(#key) },
        None => quote! { None },
    };

    let keys = properties.iter().map(|p| &p.key);
    let declarations = properties.iter().map(property_declaration);

    let state_field = &field_info.state_field;
    let other_fields = &field_info.other_fields;

    quote! {
        impl #impl_generics model_object::ModelSchema for #name #ty_generics #where_clause {
            fn model_name() -> &'static str {
                #model_name
            }

            fn primary_key() -> Option<&'static str> {
                #primary_key
            }

            fn declared_properties(
            ) -> model_object::ModelResult<Vec<(String, model_object::PropertyDeclaration)>> {
                Ok(vec![
                    #( (#keys.to_string(), #declarations) ),*
                ])
            }

            fn from_state(state: model_object::ModelState) -> Self {
                Self {
                    #state_field: state,
                    #( #other_fields: ::core::default::Default::default(), )*
                }
            }

            fn state(&self) -> &model_object::ModelState {
                &self.#state_field
            }

            fn state_mut(&mut self) -> &mut model_object::ModelState {
                &mut self.#state_field
            }
        }
    }
}
