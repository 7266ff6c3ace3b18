//! Procedural macros for the scenescope inspector runtime.
//!
//! - `#[derive(Label)]`: Implements `scenescope::Label` for an enum, returning the
//!   variant name. Protocol enums (`Action`, `Message`, `Source`) use it so log lines
//!   and dispatch tables name variants the same way the wire does.
//!
//! Usage:
//! ```rust,ignore
//! use scenescope::Label;
//!
//! #[derive(Clone, Debug, Label)]
//! enum Hop { PanelToRelay, RelayToPage }
//!
//! assert_eq!(Hop::RelayToPage.label(), "RelayToPage");
//! ```
use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derives `scenescope::Label` returning the variant name for enums.
///
/// For structs the label is the type name.
#[proc_macro_derive(Label)]
pub fn derive_label(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ident = input.ident.clone();
    let generics = input.generics.clone();

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &input.data {
        Data::Enum(data_enum) => {
            let match_arms = data_enum.variants.iter().map(|variant| {
                let variant_ident = &variant.ident;
                let variant_name = variant_ident.to_string();

                let pattern = match &variant.fields {
                    Fields::Unit => quote! { Self::#variant_ident },
                    Fields::Unnamed(_) => quote! { Self::#variant_ident(..) },
                    Fields::Named(_) => quote! { Self::#variant_ident { .. } },
                };

                quote! {
                    #pattern => ::std::borrow::Cow::Borrowed(#variant_name)
                }
            });

            // Empty enums have no arms; `match *self {}` keeps them well-formed.
            if data_enum.variants.is_empty() {
                quote! { match *self {} }
            } else {
                quote! {
                    match self {
                        #(#match_arms),*
                    }
                }
            }
        }
        _ => {
            let name = ident.to_string();
            quote! { ::std::borrow::Cow::Borrowed(#name) }
        }
    };

    let expanded = quote! {
        impl #impl_generics scenescope::Label for #ident #ty_generics #where_clause {
            fn label(&self) -> ::std::borrow::Cow<'static, str> {
                #body
            }
        }
    };
    TokenStream::from(expanded)
}
