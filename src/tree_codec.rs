use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Data, DeriveInput, Error, Index, Member, Result};

use crate::common::{add_trait_bounds, Config, ContainerOptions, Params};

/// Records encode as an empty value with one child per field, in
/// declaration order.
pub fn doit(input: DeriveInput) -> Result<TokenStream> {
    let mut params = Params::new();
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("tree_codec")) {
        params.extend(attr.parse_args_with(Params::parse_terminated)?);
    }
    let options = ContainerOptions::try_from(params)?;
    if let Some(codec) = &options.codec {
        Err(Error::new(
            codec.span,
            "`codec` is implied by `TreeCodec`",
        ))?
    }
    let Config { krate, .. } = Config::new(options);

    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = &input;
    let Data::Struct(data) = data else {
        return Err(Error::new_spanned(
            ident,
            "`TreeCodec` derives records, use `#[dynamic_variant(codec)]` on enums",
        ));
    };

    let (members, names): (Vec<Member>, Vec<String>) = data
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
            None => (Member::Unnamed(Index::from(index)), index.to_string()),
        })
        .unzip();
    let indices = 0..members.len();
    let count = members.len();

    let encode_generics = add_trait_bounds(generics, &parse_quote!(#krate::Encode));
    let (encode_impl_generics, ty_generics, encode_where_clause) = encode_generics.split_for_impl();
    let decode_generics = add_trait_bounds(generics, &parse_quote!(#krate::Decode));
    let (decode_impl_generics, _, decode_where_clause) = decode_generics.split_for_impl();

    let encode_indices = indices.clone();
    Ok(quote! {
        impl #encode_impl_generics #krate::Encode for #ident #ty_generics #encode_where_clause {
            fn encode<__W: #krate::TreeWrite>(&self, tree: &mut __W) -> ::core::result::Result<(), #krate::EncodeError> {
                #krate::codec::encode_record(tree, #count);
                #(#krate::codec::encode_field(tree, #encode_indices, #names, &self.#members)?;)*
                ::core::result::Result::Ok(())
            }
        }

        impl #decode_impl_generics #krate::Decode for #ident #ty_generics #decode_where_clause {
            fn decode<__R: #krate::TreeRead>(tree: &__R) -> ::core::result::Result<Self, #krate::DecodeError> {
                #krate::codec::expect_children(tree, #count)?;
                ::core::result::Result::Ok(Self {
                    #(#members: #krate::codec::decode_field(tree, #indices, #names)?,)*
                })
            }
        }
    })
}
