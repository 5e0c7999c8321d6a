//! Derive macros for todosync
//!
//! Action enums mix two kinds of variants: *commands*, which ask for a
//! remote call, and *events*, which describe a state change for the
//! reducers to apply. `#[derive(Action)]` generates the helpers that tell
//! them apart.
//!
//! ```ignore
//! use todosync_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum ListAction {
//!     #[command]
//!     CreateTodolist { title: String },
//!
//!     #[event]
//!     TodolistAdded { id: String, title: String },
//! }
//!
//! assert!(ListAction::CreateTodolist { title: "Groceries".into() }.is_command());
//! assert_eq!(ListAction::TodolistAdded { id: "L1".into(), title: "x".into() }.kind(), "TodolistAdded");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Variant};

/// `is_command()`, `is_event()` and `kind()` for an action enum
///
/// Mark variants with `#[command]` or `#[event]`. Unmarked variants answer
/// `false` to both. `kind()` returns the variant name, which is handy as a
/// log field.
///
/// Fails to compile on structs and unions, and on a variant carrying both
/// markers.
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Command,
    Event,
    Plain,
}

fn role(variant: &Variant) -> syn::Result<Role> {
    let marked = |name: &str| variant.attrs.iter().any(|attr| attr.path().is_ident(name));

    match (marked("command"), marked("event")) {
        (true, true) => Err(syn::Error::new_spanned(
            &variant.ident,
            "an action variant is either #[command] or #[event], not both",
        )),
        (true, false) => Ok(Role::Command),
        (false, true) => Ok(Role::Event),
        (false, false) => Ok(Role::Plain),
    }
}

/// Pattern matching every value of the variant, whatever its fields
fn pattern(variant: &Variant) -> TokenStream2 {
    let ident = &variant.ident;
    match variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Action)] only applies to enums",
        ));
    };

    let variants = data
        .variants
        .iter()
        .map(|variant| role(variant).map(|role| (pattern(variant), variant.ident.to_string(), role)))
        .collect::<syn::Result<Vec<_>>>()?;

    let test_for = |wanted: Role| {
        let patterns: Vec<_> = variants
            .iter()
            .filter(|(_, _, role)| *role == wanted)
            .map(|(pattern, _, _)| pattern)
            .collect();
        if patterns.is_empty() {
            quote! { false }
        } else {
            quote! { matches!(self, #(#patterns)|*) }
        }
    };
    let is_command = test_for(Role::Command);
    let is_event = test_for(Role::Event);
    let kinds = variants.iter().map(|(pattern, kind, _)| quote! { #pattern => #kind });

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Whether this variant is marked `#[command]`
            #[must_use]
            pub const fn is_command(&self) -> bool {
                #is_command
            }

            /// Whether this variant is marked `#[event]`
            #[must_use]
            pub const fn is_event(&self) -> bool {
                #is_event
            }

            /// Name of this variant
            #[must_use]
            pub const fn kind(&self) -> &'static str {
                match self {
                    #(#kinds,)*
                }
            }
        }
    })
}
