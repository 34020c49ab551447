use proc_macro2::{Delimiter, Group, Span, TokenStream};
use quote::{quote, ToTokens, TokenStreamExt};
use syn::{
    parenthesized,
    parse::{Parse, ParseStream, Parser},
    parse_quote,
    punctuated::Punctuated,
    token, Attribute, Error, Fields, FieldsUnnamed, GenericArgument, GenericParam, Generics, Ident,
    LitStr, Path, PathArguments, Result, Token, Type, TypePath, Variant,
};
use tap::prelude::*;

pub mod kw {
    syn::custom_keyword!(codec);
    syn::custom_keyword!(from);
}

/// One entry of `#[dynamic_variant(...)]`, `#[variant(...)]` or
/// `#[tree_codec(...)]`.
pub enum Param {
    Codec(kw::codec),
    Crate {
        crate_token: Token![crate],
        eq_token: Token![=],
        path: LitStr,
    },
    From {
        from_token: kw::from,
        paren_token: token::Paren,
        types: Punctuated<Type, Token![,]>,
    },
}
impl Param {
    fn span(&self) -> Span {
        match self {
            Param::Codec(codec) => codec.span,
            Param::Crate { crate_token, .. } => crate_token.span,
            Param::From { from_token, .. } => from_token.span,
        }
    }
}
impl Parse for Param {
    fn parse(input: ParseStream) -> Result<Self> {
        let lookahead = input.lookahead1();
        if lookahead.peek(kw::codec) {
            Ok(Param::Codec(input.parse()?))
        } else if lookahead.peek(Token![crate]) {
            Ok(Param::Crate {
                crate_token: input.parse()?,
                eq_token: input.parse()?,
                path: input.parse()?,
            })
        } else if lookahead.peek(kw::from) {
            let content;
            Ok(Param::From {
                from_token: input.parse()?,
                paren_token: parenthesized!(content in input),
                types: Punctuated::parse_terminated(&content)?,
            })
        } else {
            Err(lookahead.error())
        }
    }
}

pub type Params = Punctuated<Param, Token![,]>;
#[inline]
pub fn parse_params(args: TokenStream) -> Result<Params> {
    Params::parse_terminated.parse2(args)
}

pub fn fill_empty_or_else<T>(
    opt: &mut Option<T>,
    new: T,
    err: impl FnOnce(&T, T) -> Error,
) -> Result<()> {
    match opt {
        Some(old) => Err(err(old, new)),
        None => {
            opt.replace(new);
            Ok(())
        }
    }
}

/// Parameters accepted on the enum or struct itself.
#[derive(Default)]
pub struct ContainerOptions {
    pub codec: Option<kw::codec>,
    pub krate: Option<Path>,
}
impl TryFrom<Params> for ContainerOptions {
    type Error = Error;
    fn try_from(params: Params) -> std::result::Result<Self, Self::Error> {
        let mut options = ContainerOptions::default();
        for param in params {
            let span = param.span();
            match param {
                Param::Codec(codec) => {
                    fill_empty_or_else(&mut options.codec, codec, |_, _| {
                        Error::new(span, "duplicate parameter `codec`")
                    })?
                }
                Param::Crate {
                    crate_token,
                    eq_token,
                    path,
                } => {
                    fill_empty_or_else(&mut options.krate, path.parse()?, |_, _| {
                        Error::new_spanned(
                            quote!(#crate_token #eq_token #path),
                            "duplicate parameter `crate`",
                        )
                    })?
                }
                Param::From { paren_token, .. } => Err(Error::new(
                    paren_token.span.join(),
                    "`from(...)` belongs on an alternative, as `#[variant(from(...))]`",
                ))?,
            }
        }
        Ok(options)
    }
}

pub struct Config {
    pub codec: bool,
    /// Path to the runtime crate.
    pub krate: Path,
}
impl Config {
    pub fn new(ContainerOptions { codec, krate }: ContainerOptions) -> Self {
        Self {
            codec: codec.is_some(),
            krate: krate.unwrap_or_else(|| parse_quote!(::dynvar)),
        }
    }
}

/// Splits `#[variant(...)]` off an alternative's attributes, returning the
/// remaining attributes and the `from(...)` source types.
fn alternative_options(attrs: &[Attribute]) -> Result<(Vec<Attribute>, Vec<Type>)> {
    let mut kept = Vec::new();
    let mut from = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("variant") {
            kept.push(attr.clone());
            continue;
        }
        for param in attr.parse_args_with(Params::parse_terminated)? {
            match param {
                Param::From { types, .. } => from.extend(types),
                other => Err(Error::new(
                    other.span(),
                    "only `from(...)` is valid on an alternative",
                ))?,
            }
        }
    }
    Ok((kept, from))
}

/// `T` when `ty` is written as `Box<T>`.
fn box_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    let segment = path.segments.last()?;
    if segment.ident != "Box" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// An enum variant wrapping exactly one alternative type. A unit variant
/// `Foo` wraps the type `Foo`; a `Box<T>` field stores `T` boxed.
pub struct Alternative {
    pub attrs: Vec<Attribute>,
    pub id: Ident,
    /// The field type as written, `Box` included.
    pub field_ty: Type,
    /// The alternative type.
    pub ty: Type,
    pub boxed: bool,
    pub from: Vec<Type>,
}

impl Alternative {
    /// Builds the enum field from a value of the alternative type.
    pub fn wrap(&self, value: TokenStream) -> TokenStream {
        if self.boxed {
            quote!(::std::boxed::Box::new(#value))
        } else {
            value
        }
    }

    /// `&T` from a binding to `&FieldTy`.
    pub fn borrow(&self, binding: &Ident) -> TokenStream {
        if self.boxed {
            quote!(&**#binding)
        } else {
            quote!(#binding)
        }
    }

    pub fn borrow_mut(&self, binding: &Ident) -> TokenStream {
        if self.boxed {
            quote!(&mut **#binding)
        } else {
            quote!(#binding)
        }
    }

    /// `T` from a binding to an owned `FieldTy`.
    pub fn unwrap(&self, binding: &Ident) -> TokenStream {
        if self.boxed {
            quote!(*#binding)
        } else {
            quote!(#binding)
        }
    }
}

impl ToTokens for Alternative {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        for attr in &self.attrs {
            attr.to_tokens(tokens);
        }
        self.id.to_tokens(tokens);
        tokens.append(Group::new(
            Delimiter::Parenthesis,
            self.field_ty.to_token_stream(),
        ));
    }
}

impl TryFrom<&Variant> for Alternative {
    type Error = Error;
    fn try_from(variant: &Variant) -> std::result::Result<Self, Self::Error> {
        if let Some((_, discriminant)) = &variant.discriminant {
            Err(Error::new_spanned(
                discriminant,
                "explicit discriminants are unsupported, declaration order is the tag",
            ))?
        }
        let (attrs, from) = alternative_options(&variant.attrs)?;
        let id = variant.ident.clone();
        let field_ty = match &variant.fields {
            Fields::Named(named_fields) => Err(Error::new(
                named_fields.brace_token.span.join(),
                "named fields unsupported",
            ))?,
            Fields::Unnamed(FieldsUnnamed {
                unnamed,
                paren_token,
            }) => match unnamed.first() {
                Some(field) if unnamed.len() == 1 => field.ty.clone(),
                _ => Err(Error::new(
                    paren_token.span.join(),
                    "tuple-like variant must have exactly 1 field",
                ))?,
            },
            Fields::Unit => Type::Path(TypePath {
                qself: None,
                path: Path::from(id.clone()),
            }),
        };
        let (ty, boxed) = match box_inner(&field_ty) {
            Some(inner) => (inner.clone(), true),
            None => (field_ty.clone(), false),
        };
        Ok(Alternative {
            attrs,
            id,
            field_ty,
            ty,
            boxed,
            from,
        })
    }
}

/// Adds `bound` to every type parameter.
pub fn add_trait_bounds(generics: &Generics, bound: &Path) -> Generics {
    generics.clone().tap_mut(|generics| {
        for param in &mut generics.params {
            if let GenericParam::Type(type_param) = param {
                type_param.bounds.push(parse_quote!(#bound));
            }
        }
    })
}
