use crate::{paths::paths, util::option_inner};
use darling::{
    Error as DarlingError, FromDeriveInput, FromField, FromMeta,
    ast::{Data, Fields},
    util::Ignored,
};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Generics, Ident, Lit, Path, Type, ext::IdentExt};

///
/// ModelArgs
/// `#[model(..)]` on the struct.
///

#[derive(FromDeriveInput)]
#[darling(attributes(model), supports(struct_named))]
struct ModelArgs {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, FieldArgs>,

    #[darling(default)]
    path: Option<String>,

    #[darling(default)]
    identifier: Option<String>,

    /// Comma-separated field names.
    #[darling(default)]
    primary_key: Option<String>,

    #[darling(multiple)]
    getter: Vec<GetterArgs>,
}

///
/// GetterArgs
///

#[derive(FromMeta)]
struct GetterArgs {
    name: String,
    with: Path,
}

///
/// FieldArgs
/// `#[field(..)]` on one named field.
///

#[derive(FromField)]
#[darling(attributes(field))]
struct FieldArgs {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    read_only: bool,

    #[darling(default)]
    protected: bool,

    #[darling(default)]
    private: bool,

    #[darling(default)]
    no_decoration: bool,

    #[darling(default)]
    enumeration: bool,

    #[darling(default)]
    object: bool,

    #[darling(default)]
    default: Option<Lit>,

    #[darling(multiple)]
    construct: Vec<Lit>,
}

impl FieldArgs {
    fn validate(&self, ident: &Ident) -> Result<(), DarlingError> {
        if self.protected && self.private {
            return Err(
                DarlingError::custom("a field cannot be both protected and private")
                    .with_span(ident),
            );
        }
        if self.enumeration && self.object {
            return Err(
                DarlingError::custom("a field cannot be both an enumeration and an object")
                    .with_span(ident),
            );
        }
        if !self.object && !self.construct.is_empty() {
            return Err(
                DarlingError::custom("construct arguments are only accepted on object fields")
                    .with_span(ident),
            );
        }

        Ok(())
    }

    // one `model.<kind>(..)` call with its flag chain
    fn declaration(&self) -> Result<TokenStream, DarlingError> {
        let ident = self
            .ident
            .as_ref()
            .ok_or_else(|| DarlingError::custom("model fields must be named"))?;
        self.validate(ident)?;

        let name = ident.unraw().to_string();
        let nullable = option_inner(&self.ty);
        let inner = nullable.unwrap_or(&self.ty);
        let ty = &self.ty;

        let head = if self.enumeration {
            quote!(model.enumeration::<#inner>(#name))
        } else if self.object {
            quote!(model.object::<#inner>(#name))
        } else {
            quote!(model.typed::<#ty>(#name))
        };

        let mut chain = Vec::new();
        if (self.enumeration || self.object) && nullable.is_some() {
            chain.push(quote!(.nullable()));
        }
        if self.read_only {
            chain.push(quote!(.read_only()));
        }
        if self.protected {
            chain.push(quote!(.protected()));
        }
        if self.private {
            chain.push(quote!(.private()));
        }
        if self.no_decoration {
            chain.push(quote!(.no_decoration()));
        }
        if let Some(default) = &self.default {
            chain.push(quote!(.default(#default)));
        }
        for arg in &self.construct {
            chain.push(quote!(.construct(#arg)));
        }

        Ok(quote!(#head #(#chain)*;))
    }
}

// ============================================================================
// EXPANSION
// ============================================================================

pub fn derive_model(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let args = match ModelArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(err) => return err.write_errors(),
    };

    expand(&args).unwrap_or_else(DarlingError::write_errors)
}

fn expand(args: &ModelArgs) -> Result<TokenStream, DarlingError> {
    if !args.generics.params.is_empty() {
        return Err(
            DarlingError::custom("Model cannot be derived for generic structs")
                .with_span(&args.generics),
        );
    }

    let Data::Struct(Fields { fields, .. }) = &args.data else {
        return Err(DarlingError::unsupported_shape("enum"));
    };

    let mut errors = DarlingError::accumulator();
    let declarations: Vec<TokenStream> = fields
        .iter()
        .filter_map(|field| errors.handle(field.declaration()))
        .collect();
    errors.finish()?;

    let core = paths().core;
    let ident = &args.ident;
    let path = match &args.path {
        Some(path) => quote!(#path),
        None => {
            let name = ident.unraw().to_string();
            quote!(::core::concat!(::core::module_path!(), "::", #name))
        }
    };

    let getters = args.getter.iter().map(|getter| {
        let name = &getter.name;
        let with = &getter.with;

        quote!(model.getter(#name, #with);)
    });

    let identifier = args
        .identifier
        .as_ref()
        .map(|identifier| quote!(model.identifier(#identifier);));

    let primary_key = args.primary_key.as_ref().map(|keys| {
        let keys = keys.split(',').map(str::trim).filter(|key| !key.is_empty());

        quote!(model.primary_key(&[#(#keys),*]);)
    });

    Ok(quote! {
        impl #core::traits::ModelKind for #ident {
            const PATH: &'static str = #path;

            fn declare(model: &mut #core::model::ModelBuilder) {
                #(#declarations)*
                #(#getters)*
                #identifier
                #primary_key
            }
        }
    })
}

///
/// TESTS
///
