use crate::paths::paths;
use darling::{Error as DarlingError, FromDeriveInput, FromVariant, ast::Data, util::Ignored};
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{DeriveInput, Generics, Ident, Lit, ext::IdentExt};

///
/// EnumArgs
///

#[derive(FromDeriveInput)]
#[darling(attributes(model_enum), supports(enum_unit))]
struct EnumArgs {
    ident: Ident,
    generics: Generics,
    data: Data<VariantArgs, Ignored>,

    #[darling(default)]
    path: Option<String>,
}

///
/// VariantArgs
///

#[derive(FromVariant)]
#[darling(attributes(variant))]
struct VariantArgs {
    ident: Ident,

    #[darling(default)]
    value: Option<Lit>,
}

///
/// Backing
///

#[derive(Eq, Hash, PartialEq)]
enum Backing {
    Text(String),
    Int(i64),
}

impl VariantArgs {
    fn name(&self) -> String {
        self.ident.unraw().to_string()
    }

    fn backing(&self) -> Result<Backing, DarlingError> {
        match &self.value {
            None => Ok(Backing::Text(self.name())),
            Some(Lit::Str(text)) => Ok(Backing::Text(text.value())),
            Some(Lit::Int(int)) => Ok(Backing::Int(int.base10_parse::<i64>()?)),
            Some(other) => Err(DarlingError::custom(
                "variant values must be string or integer literals",
            )
            .with_span(other)),
        }
    }
}

pub fn derive_model_enum(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let args = match EnumArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(err) => return err.write_errors(),
    };

    expand(&args).unwrap_or_else(DarlingError::write_errors)
}

fn expand(args: &EnumArgs) -> Result<TokenStream, DarlingError> {
    if !args.generics.params.is_empty() {
        return Err(
            DarlingError::custom("ModelEnum cannot be derived for generic enums")
                .with_span(&args.generics),
        );
    }

    let Data::Enum(variants) = &args.data else {
        return Err(DarlingError::unsupported_shape("struct"));
    };

    let core = paths().core;
    let ident = &args.ident;

    // backings must be unique or decoding would be ambiguous
    let mut seen = HashSet::new();
    let mut errors = DarlingError::accumulator();
    let mut table = Vec::with_capacity(variants.len());
    for variant in variants {
        let Some(backing) = errors.handle(variant.backing()) else {
            continue;
        };
        let name = variant.name();
        let entry = match &backing {
            Backing::Text(text) => quote!(#core::model::EnumVariant::text(#name, #text)),
            Backing::Int(int) => quote!(#core::model::EnumVariant::int(#name, #int)),
        };
        if !seen.insert(backing) {
            errors.push(
                DarlingError::custom("duplicate backing value").with_span(&variant.ident),
            );
        }

        table.push(entry);
    }
    errors.finish()?;

    let path = match &args.path {
        Some(path) => quote!(#path),
        None => {
            let name = ident.unraw().to_string();
            quote!(::core::concat!(::core::module_path!(), "::", #name))
        }
    };

    let idents: Vec<&Ident> = variants.iter().map(|v| &v.ident).collect();
    let names: Vec<String> = variants.iter().map(VariantArgs::name).collect();

    Ok(quote! {
        impl #core::traits::ModelEnum for #ident {
            const MODEL: &'static #core::model::EnumModel =
                &#core::model::EnumModel::new(#path, &[#(#table),*]);

            fn from_variant(variant: &str) -> ::core::option::Option<Self> {
                match variant {
                    #(#names => ::core::option::Option::Some(Self::#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn variant(&self) -> &'static str {
                match *self {
                    #(Self::#idents => #names,)*
                }
            }
        }

        impl ::core::convert::From<#ident> for #core::value::Value {
            fn from(value: #ident) -> Self {
                Self::Enum(#core::value::ValueEnum::from_enum(&value))
            }
        }
    })
}

///
/// TESTS
///
