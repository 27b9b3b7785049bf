//! The `#[test]` attribute re-exported by `formshape-testhelpers`.

use quote::quote;
use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    /// Everything before `fn`: outer attributes, visibility, qualifiers.
    struct Prelude {
        tokens: Any<Cons<Except<KFn>, TokenTree>>,
    }

    /// Parameters, return type and where clause.
    struct Signature {
        tokens: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct TestFn {
        prelude: Prelude,
        _fn: KFn,
        name: Ident,
        signature: Signature,
        body: BraceGroup,
    }
}

impl quote::ToTokens for Prelude {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.tokens.to_tokens(tokens)
    }
}

impl quote::ToTokens for Signature {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.tokens.to_tokens(tokens)
    }
}

/// Marks a test function and installs the shared tracing setup before its
/// body runs.
///
/// ```ignore
/// use formshape_testhelpers::test;
///
/// #[test]
/// fn decodes_nested_fields() {
///     // `FORMSHAPE_LOG` controls what gets printed
/// }
/// ```
///
/// Takes no arguments.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    if !attr.is_empty() {
        return quote! {
            ::core::compile_error!("#[formshape_testhelpers::test] takes no arguments");
        }
        .into();
    }

    let item = TokenStream::from(item);
    let mut iter = item.to_token_iter();
    let TestFn {
        prelude,
        _fn,
        name,
        signature,
        body,
    } = match iter.parse::<TestFn>() {
        Ok(decl) => decl,
        Err(_) => {
            return quote! {
                ::core::compile_error!("#[formshape_testhelpers::test] expects a function");
            }
            .into();
        }
    };
    let body = body.0.stream();

    quote! {
        #[::core::prelude::rust_2024::test]
        #prelude fn #name #signature {
            ::formshape_testhelpers::setup();

            #body
        }
    }
    .into()
}
