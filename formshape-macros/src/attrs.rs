//! `#[form(...)]` field attributes.

use proc_macro2::{Delimiter, Literal, Span, TokenStream, TokenTree};

use crate::grammar::Attribute;

/// What a field's attributes say about it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldAttrs {
    /// Name set with `#[form(rename = "...")]`
    pub rename: Option<String>,
    /// Set with `#[form(skip)]`
    pub skip: bool,
}

/// An attribute that could not be understood, with the span to blame.
#[derive(Debug)]
pub struct AttrError {
    pub message: String,
    pub span: Span,
}

impl AttrError {
    fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Reads the attributes of a single field.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs, AttrError> {
    let mut parsed = FieldAttrs::default();
    for attr in attrs {
        let tokens: Vec<TokenTree> = attr.content.0.stream().into_iter().collect();
        match tokens.first() {
            Some(TokenTree::Ident(ident)) if ident == "form" => {
                let args = match tokens.get(1) {
                    Some(TokenTree::Group(g)) if g.delimiter() == Delimiter::Parenthesis => {
                        g.stream()
                    }
                    _ => return Err(AttrError::new(ident.span(), "expected `form(...)`")),
                };
                parse_form_args(args, &mut parsed)?;
            }
            _ => {}
        }
    }
    Ok(parsed)
}

/// Rejects `#[form(...)]` on the container itself.
pub fn reject_container_form_attrs(attrs: &[Attribute]) -> Result<(), AttrError> {
    for attr in attrs {
        if let Some(TokenTree::Ident(ident)) = attr.content.0.stream().into_iter().next()
            && ident == "form"
        {
            return Err(AttrError::new(
                ident.span(),
                "#[form(...)] is only supported on fields",
            ));
        }
    }
    Ok(())
}

fn parse_form_args(args: TokenStream, parsed: &mut FieldAttrs) -> Result<(), AttrError> {
    let mut tokens = args.into_iter();
    while let Some(tt) = tokens.next() {
        let TokenTree::Ident(key) = tt else {
            return Err(AttrError::new(tt.span(), "expected `rename` or `skip`"));
        };
        if key == "skip" {
            parsed.skip = true;
        } else if key == "rename" {
            match tokens.next() {
                Some(TokenTree::Punct(p)) if p.as_char() == '=' => {}
                _ => return Err(AttrError::new(key.span(), "expected `rename = \"...\"`")),
            }
            let value = match tokens.next() {
                Some(TokenTree::Literal(lit)) => string_value(&lit)
                    .ok_or_else(|| AttrError::new(lit.span(), "expected a string literal"))?,
                other => {
                    let span = other.map_or(key.span(), |tt| tt.span());
                    return Err(AttrError::new(span, "expected a string literal"));
                }
            };
            parsed.rename = Some(value);
        } else {
            return Err(AttrError::new(
                key.span(),
                format!("unknown form attribute `{key}`, expected `rename` or `skip`"),
            ));
        }

        match tokens.next() {
            None => {}
            Some(TokenTree::Punct(p)) if p.as_char() == ',' => {}
            Some(other) => return Err(AttrError::new(other.span(), "expected `,`")),
        }
    }
    Ok(())
}

/// The contents of a string literal. Raw strings are taken as is, simple
/// escapes are resolved in plain ones.
fn string_value(lit: &Literal) -> Option<String> {
    let repr = lit.to_string();
    if let Some(raw) = repr.strip_prefix('r') {
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let inner = raw
            .get(hashes..raw.len().checked_sub(hashes)?)?
            .strip_prefix('"')?
            .strip_suffix('"')?;
        return Some(inner.to_string());
    }
    let inner = repr.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            _ => return None,
        }
    }
    Some(out)
}
