//! Derive macros for the boardsync state-synchronization architecture
//!
//! This crate provides procedural macros to reduce boilerplate when building
//! request/confirmation action protocols.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates classification helpers for action enums
//!
//! # Example
//!
//! ```ignore
//! use boardsync_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodolistsAction {
//!     #[request]
//!     Fetch,
//!
//!     #[confirmed]
//!     FetchConfirmed { todolists: Vec<Todolist> },
//!
//!     #[failure]
//!     FetchRejected,
//!
//!     // unmarked: synchronous, local-only
//!     ChangeFilter { id: TodolistId, filter: FilterValue },
//! }
//!
//! // Generated methods:
//! assert!(TodolistsAction::Fetch.is_request());
//! assert!(TodolistsAction::FetchRejected.is_failure());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, parse_macro_input};

/// Derive macro for Action enums
///
/// Generates classification methods for a request/confirmation protocol:
/// - `is_request()` - the variant starts an asynchronous remote operation
/// - `is_confirmed()` - the variant carries a server-confirmed result
/// - `is_failure()` - the variant records a rejected operation
/// - `name()` - the variant name, for log and metric labels
///
/// Variants left unmarked are synchronous, local-only mutations; all three
/// classification methods return `false` for them. Composition layers use
/// the classification to derive the global request status without matching
/// on individual variants.
///
/// # Attributes
///
/// - `#[request]` - mark a variant as a remote-operation intent
/// - `#[confirmed]` - mark a variant as a server-confirmed result
/// - `#[failure]` - mark a variant as a rejected outcome
///
/// # Panics
///
/// This macro produces a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant carries more than one marker attribute
#[proc_macro_derive(Action, attributes(request, confirmed, failure))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut request_variants = Vec::new();
    let mut confirmed_variants = Vec::new();
    let mut failure_variants = Vec::new();

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;
        let markers = [
            has_attribute(&variant.attrs, "request"),
            has_attribute(&variant.attrs, "confirmed"),
            has_attribute(&variant.attrs, "failure"),
        ];

        if markers.iter().filter(|m| **m).count() > 1 {
            return syn::Error::new_spanned(
                variant,
                "Variant can carry at most one of #[request], #[confirmed], #[failure]",
            )
            .to_compile_error()
            .into();
        }

        if markers[0] {
            request_variants.push((variant_name, &variant.fields));
        }
        if markers[1] {
            confirmed_variants.push((variant_name, &variant.fields));
        }
        if markers[2] {
            failure_variants.push((variant_name, &variant.fields));
        }
    }

    let is_request_arms = request_variants.iter().map(|(v, f)| match_arm(v, f));
    let is_confirmed_arms = confirmed_variants.iter().map(|(v, f)| match_arm(v, f));
    let is_failure_arms = failure_variants.iter().map(|(v, f)| match_arm(v, f));

    // name() covers every variant, marked or not
    let name_arms = data_enum.variants.iter().map(|variant| {
        let ident = &variant.ident;
        let label = ident.to_string();
        match &variant.fields {
            Fields::Named(_) => quote! { Self::#ident { .. } => #label, },
            Fields::Unnamed(_) => quote! { Self::#ident(..) => #label, },
            Fields::Unit => quote! { Self::#ident => #label, },
        }
    });

    let expanded = quote! {
        impl #name {
            /// Returns true if this action starts a remote operation
            #[must_use]
            pub const fn is_request(&self) -> bool {
                match self {
                    #(#is_request_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action carries a server-confirmed result
            #[must_use]
            pub const fn is_confirmed(&self) -> bool {
                match self {
                    #(#is_confirmed_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action records a rejected operation
            #[must_use]
            pub const fn is_failure(&self) -> bool {
                match self {
                    #(#is_failure_arms)*
                    _ => false,
                }
            }

            /// Returns the variant name, for log and metric labels
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

/// Build a `=> true` match arm for a variant with any field shape
fn match_arm(variant: &syn::Ident, fields: &Fields) -> proc_macro2::TokenStream {
    match fields {
        Fields::Named(_) => quote! { Self::#variant { .. } => true, },
        Fields::Unnamed(_) => quote! { Self::#variant(..) => true, },
        Fields::Unit => quote! { Self::#variant => true, },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
