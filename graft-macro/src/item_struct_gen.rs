use graft_core::AggregateKind;
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{
    parse_quote, spanned::Spanned, Data, DeriveInput, Fields, GenericParam, Index, LitStr,
};

use crate::{field_attribute::FieldAttribute, graft_path_attribute};

pub(crate) fn generate(mut input: DeriveInput, kind: AggregateKind) -> syn::Result<TokenStream> {
    let graft = graft_path_attribute::graft_path(&input.attrs)?;

    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "only structs can be injected",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "only structs can be injected",
            ))
        }
    };

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new(
            lifetime.span(),
            "injected structs cannot borrow, remove the lifetime parameter",
        ));
    }

    let mut names = Vec::with_capacity(data.fields.len());
    let mut types = Vec::with_capacity(data.fields.len());
    let mut qualifiers = Vec::with_capacity(data.fields.len());
    let mut bindings = Vec::with_capacity(data.fields.len());
    let mut errors = Vec::new();

    for (index, field) in data.fields.iter().enumerate() {
        let qualifier = match FieldAttribute::from_attrs(&field.attrs) {
            Ok(attr) => attr
                .qualifier
                .unwrap_or_else(|| LitStr::new("", Span::call_site())),
            Err(e) => {
                errors.push(e);
                continue;
            }
        };

        let name = match &field.ident {
            Some(ident) => ident.to_string(),
            None => index.to_string(),
        };

        names.push(LitStr::new(&name, field.span()));
        types.push(field.ty.clone());
        qualifiers.push(qualifier);
        bindings.push(format_ident!("__field_{}", index));
    }

    if let Some(e) = errors.into_iter().reduce(|mut a, b| {
        a.combine(b);
        a
    }) {
        return Err(e);
    }

    let instance = match &data.fields {
        Fields::Unit => quote! { Self },
        Fields::Named(fields) => {
            let idents = fields.named.iter().map(|field| &field.ident);
            quote! {
                Self {
                    #(
                        #idents: #bindings,
                    )*
                }
            }
        }
        Fields::Unnamed(fields) => {
            let indexes = (0..fields.unnamed.len()).map(Index::from);
            quote! {
                Self {
                    #(
                        #indexes: #bindings,
                    )*
                }
            }
        }
    };

    let aggregate_kind = match kind {
        AggregateKind::Named => quote!(Named),
        AggregateKind::Anonymous => quote!(Anonymous),
    };

    input.generics.params.iter_mut().for_each(|param| {
        if let GenericParam::Type(param) = param {
            param.bounds.push(parse_quote!('static));
        }
    });

    {
        let where_clause = input.generics.make_where_clause();
        types.iter().for_each(|ty| {
            where_clause
                .predicates
                .push(parse_quote!(#ty: #graft::Injectable + ::core::clone::Clone));
        });
    }

    let struct_ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expand = quote! {
        impl #impl_generics #graft::Injectable for #struct_ident #ty_generics #where_clause {
            fn ty() -> #graft::Type {
                #graft::Type::new::<Self>(#graft::Kind::Aggregate {
                    kind: #graft::AggregateKind::#aggregate_kind,
                    fields: <Self as #graft::Aggregate>::fields,
                })
            }
        }

        impl #impl_generics #graft::Aggregate for #struct_ident #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<#graft::Field> {
                ::std::vec![
                    #(
                        #graft::Field::new::<#types>(#names, #qualifiers),
                    )*
                ]
            }

            #[allow(unused_mut, unused_variables)]
            fn from_instances(
                instances: ::std::vec::Vec<#graft::Instance>,
            ) -> ::core::result::Result<Self, #graft::Error> {
                let mut instances = instances.into_iter();

                #(
                    let #bindings = #graft::take_instance::<#types>(&mut instances, #qualifiers)?;
                )*

                ::core::result::Result::Ok(#instance)
            }
        }
    };

    Ok(expand)
}
