use proc_macro2::TokenStream;
use quote::quote;
use syn::Path;

const INTERNAL_CRATES: &[&str] = &["ornament-core", "ornament-derive"];

fn env_path(name: &str) -> Option<TokenStream> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .and_then(|value| syn::parse_str::<Path>(&value).ok())
        .map(|path| quote!(#path))
}

///
/// CratePaths
///
/// Resolves the core crate root for generated code. Inside the workspace's
/// own crates this is `ornament_core`; everywhere else it is the public
/// `ornament::core` facade. `ORNAMENT_CORE_CRATE` overrides both.
///

#[derive(Clone, Debug)]
pub struct CratePaths {
    pub core: TokenStream,
}

impl CratePaths {
    #[must_use]
    pub fn new() -> Self {
        let pkg = std::env::var("CARGO_PKG_NAME").unwrap_or_default();

        let core = if INTERNAL_CRATES.contains(&pkg.as_str()) {
            quote!(::ornament_core)
        } else {
            quote!(::ornament::core)
        };

        Self {
            core: env_path("ORNAMENT_CORE_CRATE").unwrap_or(core),
        }
    }
}

#[must_use]
pub fn paths() -> CratePaths {
    CratePaths::new()
}

///
/// TEST ENV
/// Environment guards shared by every test that expands a macro.
///


///
/// TESTS
///
