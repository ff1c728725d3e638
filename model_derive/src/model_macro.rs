use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Error};

use crate::parsing::SchemaArgs;

/// Convenience attribute macro that adds all necessary derives for a model
///
/// Arguments, when given, are forwarded as `#[schema(...)]`.
pub fn model_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    // Reject bad arguments here so the error points at #[model]
    let attr = proc_macro2::TokenStream::from(attr);
    if let Err(e) = syn::parse2::<SchemaArgs>(attr.clone()) {
        return e.to_compile_error().into();
    }

    let name = &input.ident;
    let attrs = &input.attrs;
    let vis = &input.vis;
    let generics = &input.generics;
    let where_clause = &generics.where_clause;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Error::new_spanned(name, "model can only be used on structs")
                .to_compile_error()
                .into()
        }
    };

    let schema = if attr.is_empty() {
        quote! {}
    } else {
        quote! { #[schema(#attr)] }
    };

    let expanded = quote! {
        #[derive(Debug, Clone, ModelSchema)]
        #schema
        #(#attrs)*
        #vis struct #name #generics #where_clause #fields
    };

    TokenStream::from(expanded)
}
