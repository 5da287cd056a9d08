//! `#[derive(FailureKind)]` - parent relation for kind enums.
//!
//! Syntax: `#[kind(is_a = Parent)]` on a variant.

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Ident, Result};

/// One parsed variant.
struct KindVariant {
    ident: Ident,
    parent: Option<Ident>,
}

pub fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let variants = parse(input)?;
    check_parents(&variants)?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let parent_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        match &v.parent {
            Some(parent) => quote! { Self::#ident => ::core::option::Option::Some(Self::#parent), },
            None => quote! { Self::#ident => ::core::option::Option::None, },
        }
    });
    let name_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let text = ident.to_string();
        quote! { Self::#ident => #text, }
    });

    Ok(quote! {
        impl #impl_generics ::fallthrough::FailureKind for #name #ty_generics #where_clause {
            fn parent(self) -> ::core::option::Option<Self> {
                match self {
                    #(#parent_arms)*
                }
            }

            fn name(self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    })
}

fn parse(input: &DeriveInput) -> Result<Vec<KindVariant>> {
    let data = match &input.data {
        Data::Enum(data) => data,
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "FailureKind can only be derived for enums",
            ))
        }
    };

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new_spanned(
                &variant.fields,
                "FailureKind variants cannot have fields",
            ));
        }

        let mut parent: Option<Ident> = None;
        for attr in &variant.attrs {
            if !attr.path().is_ident("kind") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if !meta.path.is_ident("is_a") {
                    return Err(meta.error("expected `is_a = Parent`"));
                }
                let value: Ident = meta.value()?.parse()?;
                if parent.is_some() {
                    return Err(Error::new_spanned(&value, "duplicate `is_a`"));
                }
                parent = Some(value);
                Ok(())
            })?;
        }

        variants.push(KindVariant {
            ident: variant.ident.clone(),
            parent,
        });
    }
    Ok(variants)
}

/// Every parent must name a variant, and following parents must end at a root.
fn check_parents(variants: &[KindVariant]) -> Result<()> {
    let parents: HashMap<String, Option<&Ident>> = variants
        .iter()
        .map(|v| (v.ident.to_string(), v.parent.as_ref()))
        .collect();

    for v in variants {
        let Some(parent) = &v.parent else { continue };
        if *parent == v.ident {
            return Err(Error::new_spanned(
                parent,
                format!("`{}` cannot be its own parent", v.ident),
            ));
        }
        if !parents.contains_key(&parent.to_string()) {
            return Err(Error::new_spanned(
                parent,
                format!("unknown kind `{}`", parent),
            ));
        }
    }

    for v in variants {
        let mut current = v.parent.as_ref();
        let mut steps = 0;
        while let Some(parent) = current {
            steps += 1;
            if steps > variants.len() {
                return Err(Error::new_spanned(
                    &v.ident,
                    format!("`{}` is part of an `is_a` cycle", v.ident),
                ));
            }
            current = parents.get(&parent.to_string()).copied().flatten();
        }
    }
    Ok(())
}
