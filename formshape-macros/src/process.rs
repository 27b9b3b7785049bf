use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned};

use crate::attrs::{AttrError, parse_field_attrs, reject_container_form_attrs};
use crate::grammar::{AdtDecl, EnumDecl, StructBody, StructDecl};

impl AttrError {
    fn into_compile_error(self) -> TokenStream {
        let message = self.message;
        quote_spanned! { self.span => ::core::compile_error!(#message); }
    }
}

/// Generates the `Shaped` impl for a parsed declaration.
pub fn process_adt(adt: AdtDecl) -> TokenStream {
    let result = match adt {
        AdtDecl::Struct(decl) => process_struct(&decl),
        AdtDecl::Enum(decl) => process_enum(&decl),
    };
    result.unwrap_or_else(AttrError::into_compile_error)
}

fn process_struct(decl: &StructDecl) -> Result<TokenStream, AttrError> {
    reject_container_form_attrs(&decl.attrs)?;
    let name = &decl.name;
    let name_str = name.to_string();

    let fields = match &decl.body {
        StructBody::Named(fields) => fields,
        StructBody::Tuple(_) | StructBody::Unit(_) => {
            let message = "#[derive(Shaped)] needs a struct with named fields, or an enum";
            return Ok(quote_spanned! { name.span() => ::core::compile_error!(#message); });
        }
    };

    let mut field_shapes = Vec::new();
    for field in fields.content.iter() {
        let field = &field.value;
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let ident = &field.name;
        let ty = &field.ty;
        let plain = unraw(ident);
        let getter = format_ident!("get_{}", plain);
        let key = attrs.rename.unwrap_or(plain);

        field_shapes.push(quote! {
            ::formshape::Field {
                name: #key,
                shape: || <#ty as ::formshape::Shaped>::SHAPE,
                get_mut: {
                    fn #getter(
                        parent: &mut ::formshape::Erased,
                    ) -> ::core::option::Option<&mut ::formshape::Erased> {
                        let parent = parent.downcast_mut::<#name>()?;
                        ::core::option::Option::Some(&mut parent.#ident as &mut ::formshape::Erased)
                    }
                    #getter
                },
            }
        });
    }

    Ok(quote! {
        #[automatically_derived]
        impl ::formshape::Shaped for #name {
            const SHAPE: &'static ::formshape::Shape = &const {
                ::formshape::Shape {
                    id: ::formshape::Shape::id_of::<Self>(),
                    type_identifier: #name_str,
                    def: ::formshape::Def::Struct(::formshape::StructDef::new(&const {
                        [#(#field_shapes),*]
                    })),
                    vtable: ::formshape::ValueVTable::of::<Self>(),
                }
            };
        }
    })
}

/// Enums are opaque to the decoder: a converter produces the whole value.
fn process_enum(decl: &EnumDecl) -> Result<TokenStream, AttrError> {
    reject_container_form_attrs(&decl.attrs)?;
    let name = &decl.name;
    let name_str = name.to_string();

    Ok(quote! {
        #[automatically_derived]
        impl ::formshape::Shaped for #name {
            const SHAPE: &'static ::formshape::Shape = &const {
                ::formshape::Shape {
                    id: ::formshape::Shape::id_of::<Self>(),
                    type_identifier: #name_str,
                    def: ::formshape::Def::Scalar,
                    vtable: ::formshape::ValueVTable::of::<Self>(),
                }
            };
        }
    })
}

fn unraw(ident: &proc_macro2::Ident) -> String {
    let raw = ident.to_string();
    raw.strip_prefix("r#").map(str::to_owned).unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_adt;

    fn expand(input: TokenStream) -> String {
        let adt = parse_adt(input).unwrap_or_else(|err| panic!("{err}"));
        process_adt(adt).to_string()
    }

    #[test]
    fn struct_fields_become_shape_fields() {
        let out = expand(quote! {
            #[derive(Default)]
            pub struct Person {
                /// Shown on the badge
                pub name: String,
                #[form(rename = "e-mail")]
                email: Option<String>,
                #[form(skip)]
                secret: String,
            }
        });

        assert!(out.contains("impl :: formshape :: Shaped for Person"));
        assert!(out.contains("name : \"name\""));
        assert!(out.contains("name : \"e-mail\""));
        assert!(!out.contains("secret"));
        assert!(!out.contains("Shown on the badge"));
        assert!(out.contains("downcast_mut :: < Person >"));
    }

    #[test]
    fn raw_identifiers_lose_their_prefix() {
        let out = expand(quote! {
            struct Keyword { r#type: String }
        });
        assert!(out.contains("name : \"type\""));
        assert!(out.contains("parent . r#type"));
    }

    #[test]
    fn enums_are_scalars() {
        let out = expand(quote! {
            #[derive(Default)]
            enum Color { #[default] Red, Green }
        });
        assert!(out.contains(":: formshape :: Def :: Scalar"));
    }

    #[test]
    fn tuple_structs_are_rejected() {
        let out = expand(quote! { struct Meters(u32); });
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn generics_are_rejected() {
        let Err(err) = parse_adt(quote! { struct Wrapper<T> { inner: T } }) else {
            panic!("generic struct was accepted");
        };
        assert_eq!(err, "#[derive(Shaped)] does not support generic types");
    }

    #[test]
    fn unsupported_items_report_a_message() {
        let Err(err) = parse_adt(quote! { union Bits { a: u32, b: f32 } }) else {
            panic!("union was accepted");
        };
        assert!(
            err.starts_with("#[derive(Shaped)] supports structs with named fields and enums: "),
            "{err}"
        );
    }

    #[test]
    fn form_attribute_on_container_is_rejected() {
        let out = expand(quote! {
            #[form(skip)]
            struct Person { name: String }
        });
        assert!(out.contains("only supported on fields"));
    }
}
