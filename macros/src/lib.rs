//! Derive macros for LuxeLane actions
//!
//! This crate provides procedural macros to reduce boilerplate when declaring
//! the action enums that drive LuxeLane reducers.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates helpers for action enums (intents/responses)
//!
//! # Example
//!
//! ```ignore
//! use luxelane_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum CatalogAction {
//!     #[intent]
//!     Refresh,
//!
//!     #[response]
//!     ProductsLoaded { products: Vec<Product> },
//! }
//!
//! // Generated methods:
//! assert!(CatalogAction::Refresh.is_intent());
//! assert_eq!(CatalogAction::Refresh.name(), "Refresh");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_intent()` - Returns true if this variant is something the user asked for
/// - `is_response()` - Returns true if this variant reports the outcome of an effect
/// - `name()` - Returns the variant name, for logging
///
/// # Attributes
///
/// - `#[intent]` - Mark a variant as a user intent
/// - `#[response]` - Mark a variant as an effect response
///
/// Unmarked variants are neither.
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has both `#[intent]` and `#[response]` attributes
///
/// # Example
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum CartAction {
///     #[intent]
///     AddToCart { product: Product },
///
///     #[intent]
///     ClearCart,
///
///     #[response]
///     PricesRefreshed(Vec<Product>),
/// }
///
/// let action = CartAction::ClearCart;
/// assert!(action.is_intent());
/// assert!(!action.is_response());
/// ```
#[proc_macro_derive(Action, attributes(intent, response))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut intent_arms = Vec::new();
    let mut response_arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_intent = has_attribute(&variant.attrs, "intent");
        let is_response = has_attribute(&variant.attrs, "response");

        if is_intent && is_response {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[intent] and #[response]",
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(&variant.ident, &variant.fields);

        if is_intent {
            intent_arms.push(quote! { #pattern => true, });
        }

        if is_response {
            response_arms.push(quote! { #pattern => true, });
        }

        let variant_name = variant.ident.to_string();
        name_arms.push(quote! { #pattern => #variant_name, });
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a user intent
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_intent(&self) -> bool {
                match self {
                    #(#intent_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action reports the outcome of an effect
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_response(&self) -> bool {
                match self {
                    #(#response_arms)*
                    _ => false,
                }
            }

            /// Returns the variant name
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern for a variant that ignores its fields
fn variant_pattern(variant: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(_) => quote! { Self::#variant { .. } },
        Fields::Unnamed(_) => quote! { Self::#variant(..) },
        Fields::Unit => quote! { Self::#variant },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
