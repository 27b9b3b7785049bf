//! Token grammar for `#[derive(Shaped)]` input.

use proc_macro2::{Delimiter, TokenStream, TokenTree};
use unsynn::*;

keyword! {
    pub KStruct = "struct";
    pub KEnum = "enum";
    pub KPub = "pub";
}

unsynn! {
    /// Visibility: `pub`, `pub(crate)` and friends
    pub enum Vis {
        PubIn(Cons<KPub, ParenthesisGroup>),
        Pub(KPub),
    }

    /// An outer attribute: `#[...]`
    pub struct Attribute {
        pub _pound: Pound,
        pub content: BracketGroup,
    }

    /// The derive input
    pub enum AdtDecl {
        Struct(StructDecl),
        Enum(EnumDecl),
    }

    pub struct StructDecl {
        pub attrs: Vec<Attribute>,
        pub vis: Option<Vis>,
        pub _kw_struct: KStruct,
        pub name: Ident,
        pub body: StructBody,
    }

    pub enum StructBody {
        Named(BraceGroupContaining<CommaDelimitedVec<StructField>>),
        Tuple(Cons<ParenthesisGroup, Semicolon>),
        Unit(Semicolon),
    }

    pub struct StructField {
        pub attrs: Vec<Attribute>,
        pub vis: Option<Vis>,
        pub name: Ident,
        pub _colon: Colon,
        pub ty: FieldType,
    }

    /// Field type: every token up to the next comma
    pub struct FieldType {
        pub tokens: Any<Cons<Except<Comma>, TokenTree>>,
    }

    pub struct EnumDecl {
        pub attrs: Vec<Attribute>,
        pub vis: Option<Vis>,
        pub _kw_enum: KEnum,
        pub name: Ident,
        pub body: BraceGroup,
    }
}

impl quote::ToTokens for FieldType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.tokens.to_tokens(tokens)
    }
}

/// Unwraps `Delimiter::None` groups, which `macro_rules!` leaves around
/// captured fragments such as `$vis:vis` or `$ty:ty`.
pub fn flatten_transparent_groups(input: TokenStream) -> TokenStream {
    input
        .into_iter()
        .flat_map(|tt| match tt {
            TokenTree::Group(group) if group.delimiter() == Delimiter::None => {
                flatten_transparent_groups(group.stream())
            }
            TokenTree::Group(group) => {
                let mut flattened =
                    proc_macro2::Group::new(group.delimiter(), flatten_transparent_groups(group.stream()));
                flattened.set_span(group.span());
                core::iter::once(TokenTree::Group(flattened)).collect()
            }
            other => core::iter::once(other).collect(),
        })
        .collect()
}

/// Returns true if the type name is followed by generic parameters.
fn has_generics(input: &TokenStream) -> bool {
    let mut tokens = input.clone().into_iter();
    while let Some(tt) = tokens.next() {
        if let TokenTree::Ident(ident) = &tt
            && (ident == "struct" || ident == "enum")
        {
            let _name = tokens.next();
            return matches!(tokens.next(), Some(TokenTree::Punct(p)) if p.as_char() == '<');
        }
    }
    false
}

/// Parses derive input into a struct or enum declaration.
pub fn parse_adt(input: TokenStream) -> core::result::Result<AdtDecl, String> {
    let input = flatten_transparent_groups(input);
    if has_generics(&input) {
        return Err("#[derive(Shaped)] does not support generic types".to_string());
    }
    let mut iter = input.to_token_iter();
    match iter.parse::<Cons<AdtDecl, EndOfStream>>() {
        Ok(parsed) => Ok(parsed.first),
        Err(err) => Err(format!(
            "#[derive(Shaped)] supports structs with named fields and enums: {err}"
        )),
    }
}
