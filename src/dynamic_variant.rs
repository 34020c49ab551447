use proc_macro2::{Ident, Span, TokenStream};
use quote::{quote, ToTokens};
use syn::{parse_quote, Error, Generics, ItemEnum, Path, Result, WherePredicate};
use tap::prelude::*;

use crate::common::{add_trait_bounds, parse_params, Alternative, Config, ContainerOptions};
use crate::resolve::{conversions, Conversion};

pub fn doit(args: TokenStream, item_enum: ItemEnum) -> Result<TokenStream> {
    let options = ContainerOptions::try_from(parse_params(args)?)?;
    let Config { codec, krate } = Config::new(options);

    let ItemEnum {
        attrs,
        vis,
        enum_token,
        ident,
        generics,
        brace_token: _,
        variants,
    } = &item_enum;

    if variants.is_empty() {
        Err(Error::new_spanned(
            ident,
            "a dynamic variant needs at least one alternative",
        ))?
    }

    let alternatives = variants
        .iter()
        .map(Alternative::try_from)
        .collect::<Result<Vec<_>>>()?;
    check_distinct(&alternatives)?;

    let target = Target {
        krate: &krate,
        ident,
        generics,
        alternatives: &alternatives,
    };

    let core = target.alternatives_impl();
    let alternative_impls = (0..alternatives.len()).map(|index| target.alternative_impl(index));
    let conversion_impls = conversions(&alternatives)
        .into_iter()
        .map(|conversion| target.conversion_impl(&conversion));
    let extraction_impls = alternatives
        .iter()
        .map(|alternative| target.extraction_impl(alternative));
    let visit_impls = target.visit_impls();
    let codec_impls = if codec {
        target.codec_impls()
    } else {
        quote!()
    };

    let where_clause = &generics.where_clause;
    Ok(quote! {
        #(#attrs)*
        #vis #enum_token #ident #generics #where_clause {
            #(#alternatives),*
        }
        #core
        #(#alternative_impls)*
        #(#conversion_impls)*
        #(#extraction_impls)*
        #visit_impls
        #codec_impls
    })
}

/// Each alternative type may appear only once, otherwise it has no single
/// index.
fn check_distinct(alternatives: &[Alternative]) -> Result<()> {
    for (index, alternative) in alternatives.iter().enumerate() {
        if let Some(first) = alternatives[..index]
            .iter()
            .find(|earlier| earlier.ty == alternative.ty)
        {
            Err(Error::new_spanned(
                &alternative.field_ty,
                format!(
                    "alternative type `{}` is already held by `{}`",
                    alternative.ty.to_token_stream(),
                    first.id
                ),
            ))?
        }
    }
    Ok(())
}

struct Target<'a> {
    krate: &'a Path,
    ident: &'a Ident,
    generics: &'a Generics,
    alternatives: &'a [Alternative],
}

impl Target<'_> {
    fn alternatives_impl(&self) -> TokenStream {
        let Target {
            krate,
            ident,
            generics,
            alternatives,
        } = self;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let names = alternatives.iter().map(|alternative| alternative.id.to_string());
        let ids = alternatives.iter().map(|alternative| &alternative.id);
        let indices = 0..alternatives.len();
        quote! {
            impl #impl_generics #krate::Alternatives for #ident #ty_generics #where_clause {
                const NAMES: &'static [&'static str] = &[#(#names),*];

                fn index(&self) -> usize {
                    match self {
                        #(Self::#ids(_) => #indices,)*
                    }
                }
            }
        }
    }

    fn alternative_impl(&self, index: usize) -> TokenStream {
        let Target {
            krate,
            ident,
            generics,
            alternatives,
        } = self;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let alternative = &alternatives[index];
        let Alternative { id, ty, .. } = alternative;
        let name = id.to_string();
        let value = Ident::new("value", Span::call_site());
        let insert = alternative.wrap(quote!(self));
        let borrow = alternative.borrow(&value);
        let borrow_mut = alternative.borrow_mut(&value);
        let unwrap = alternative.unwrap(&value);
        quote! {
            impl #impl_generics #krate::Alternative<#ident #ty_generics> for #ty #where_clause {
                const INDEX: usize = #index;
                const NAME: &'static str = #name;

                fn insert(self) -> #ident #ty_generics {
                    #ident::#id(#insert)
                }

                #[allow(unreachable_patterns)]
                fn peek(alternatives: &#ident #ty_generics) -> ::core::option::Option<&Self> {
                    match alternatives {
                        #ident::#id(#value) => ::core::option::Option::Some(#borrow),
                        _ => ::core::option::Option::None,
                    }
                }

                #[allow(unreachable_patterns)]
                fn peek_mut(alternatives: &mut #ident #ty_generics) -> ::core::option::Option<&mut Self> {
                    match alternatives {
                        #ident::#id(#value) => ::core::option::Option::Some(#borrow_mut),
                        _ => ::core::option::Option::None,
                    }
                }

                #[allow(unreachable_patterns)]
                fn extract(alternatives: #ident #ty_generics) -> ::core::result::Result<Self, #ident #ty_generics> {
                    match alternatives {
                        #ident::#id(#value) => ::core::result::Result::Ok(#unwrap),
                        other => ::core::result::Result::Err(other),
                    }
                }
            }
        }
    }

    fn conversion_impl(&self, conversion: &Conversion) -> TokenStream {
        let Target {
            krate,
            ident,
            generics,
            alternatives,
        } = self;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let Conversion {
            source,
            target,
            exact,
        } = conversion;
        let ty = &alternatives[*target].ty;
        let value = if *exact {
            quote!(value)
        } else {
            quote!(<#ty as ::core::convert::From<#source>>::from(value))
        };
        quote! {
            impl #impl_generics ::core::convert::From<#source> for #ident #ty_generics #where_clause {
                fn from(value: #source) -> Self {
                    <#ty as #krate::Alternative<Self>>::insert(#value)
                }
            }
        }
    }

    fn extraction_impl(&self, Alternative { ty, .. }: &Alternative) -> TokenStream {
        let Target {
            krate,
            ident,
            generics,
            ..
        } = self;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        quote! {
            impl #impl_generics ::core::convert::TryFrom<#ident #ty_generics> for #ty #where_clause {
                type Error = #ident #ty_generics;
                fn try_from(value: #ident #ty_generics) -> ::core::result::Result<Self, Self::Error> {
                    <#ty as #krate::Alternative<#ident #ty_generics>>::extract(value)
                }
            }
        }
    }

    /// `Accept` and `AcceptOwned`, bounded so that every alternative's
    /// handler yields the same `__R`.
    fn visit_impls(&self) -> TokenStream {
        let Target {
            krate,
            ident,
            generics,
            alternatives,
        } = self;
        let (_, ty_generics, _) = generics.split_for_impl();
        let value = Ident::new("value", Span::call_site());
        let ids: Vec<_> = alternatives.iter().map(|alternative| &alternative.id).collect();
        let tys: Vec<_> = alternatives.iter().map(|alternative| &alternative.ty).collect();
        let borrows = alternatives.iter().map(|alternative| alternative.borrow(&value));
        let unwraps = alternatives.iter().map(|alternative| alternative.unwrap(&value));

        let visit_generics = with_visitor(
            generics,
            tys.iter()
                .map(|ty| -> WherePredicate { parse_quote!(__V: #krate::Visit<#ty, Output = __R>) }),
        );
        let (visit_impl_generics, _, visit_where_clause) = visit_generics.split_for_impl();

        let consume_generics = with_visitor(
            generics,
            tys.iter()
                .map(|ty| -> WherePredicate { parse_quote!(__V: #krate::Consume<#ty, Output = __R>) }),
        );
        let (consume_impl_generics, _, consume_where_clause) = consume_generics.split_for_impl();

        quote! {
            impl #visit_impl_generics #krate::Accept<__V, __R> for #ident #ty_generics #visit_where_clause {
                fn accept(&self, visitor: &mut __V) -> __R {
                    match self {
                        #(Self::#ids(#value) => <__V as #krate::Visit<#tys>>::visit(visitor, #borrows),)*
                    }
                }
            }

            impl #consume_impl_generics #krate::AcceptOwned<__V, __R> for #ident #ty_generics #consume_where_clause {
                fn accept_owned(self, visitor: &mut __V) -> __R {
                    match self {
                        #(Self::#ids(#value) => <__V as #krate::Consume<#tys>>::consume(visitor, #unwraps),)*
                    }
                }
            }
        }
    }

    /// The variant wire shape: tag as the node value, payload as its only
    /// child.
    fn codec_impls(&self) -> TokenStream {
        let Target {
            krate,
            ident,
            generics,
            alternatives,
        } = self;
        let value = Ident::new("value", Span::call_site());
        let ids: Vec<_> = alternatives.iter().map(|alternative| &alternative.id).collect();
        let tys = alternatives.iter().map(|alternative| &alternative.ty);
        let borrows = alternatives.iter().map(|alternative| alternative.borrow(&value));
        let wraps = alternatives
            .iter()
            .map(|alternative| alternative.wrap(quote!(#value)));
        let indices = 0..alternatives.len();
        let count = alternatives.len();

        let encode_generics = add_trait_bounds(generics, &parse_quote!(#krate::Encode));
        let (encode_impl_generics, ty_generics, encode_where_clause) =
            encode_generics.split_for_impl();
        let decode_generics = add_trait_bounds(generics, &parse_quote!(#krate::Decode));
        let (decode_impl_generics, _, decode_where_clause) = decode_generics.split_for_impl();

        quote! {
            impl #encode_impl_generics #krate::Encode for #ident #ty_generics #encode_where_clause {
                fn encode<__W: #krate::TreeWrite>(&self, tree: &mut __W) -> ::core::result::Result<(), #krate::EncodeError> {
                    #krate::codec::encode_variant(tree, self, |child| match self {
                        #(Self::#ids(#value) => #krate::Encode::encode(#borrows, child),)*
                    })
                }
            }

            impl #decode_impl_generics #krate::Decode for #ident #ty_generics #decode_where_clause {
                fn decode<__R: #krate::TreeRead>(tree: &__R) -> ::core::result::Result<Self, #krate::DecodeError> {
                    #krate::codec::decode_variant(tree, |index, child| match index {
                        #(#indices => <#tys as #krate::Decode>::decode(child).map(|#value| Self::#ids(#wraps)),)*
                        _ => ::core::result::Result::Err(#krate::DecodeError::AlternativeIndexOutOfRange {
                            index: index as u64,
                            count: #count,
                        }),
                    })
                }
            }
        }
    }
}

fn with_visitor(
    generics: &Generics,
    bounds: impl Iterator<Item = WherePredicate>,
) -> Generics {
    generics.clone().tap_mut(|generics| {
        generics.params.push(parse_quote!(__V));
        generics.params.push(parse_quote!(__R));
        generics.make_where_clause().predicates.extend(bounds);
    })
}
