#![doc = include_str!("../README.md")]

mod attrs;
mod grammar;
mod process;

/// Derives `formshape::Shaped`.
///
/// See the `formshape` crate documentation for the supported inputs and the
/// `#[form(...)]` field attributes.
#[proc_macro_derive(Shaped, attributes(form))]
pub fn derive_shaped(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    match grammar::parse_adt(input.into()) {
        Ok(adt) => process::process_adt(adt).into(),
        Err(message) => quote::quote! { ::core::compile_error!(#message); }.into(),
    }
}
