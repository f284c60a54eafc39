//! Build-time asset packing.
//!
//! ```ignore
//! const LOGO: nes::rle::Rle<'static> = include_rle!("assets/logo.nam");
//! ```
//!
//! Paths are relative to the crate's `CARGO_MANIFEST_DIR`.

mod rle;

use std::path::PathBuf;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, LitStr};

/// Read a raw nametable (or any binary) and expand to a `nes::rle::Rle`
/// holding its compressed form. The stream is validated in a `const`.
#[proc_macro]
pub fn include_rle(input: TokenStream) -> TokenStream {
    let path_lit = parse_macro_input!(input as LitStr);

    match expand_rle(&path_lit) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_rle(path_lit: &LitStr) -> syn::Result<proc_macro2::TokenStream> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map_err(|e| syn::Error::new(path_lit.span(), format!("CARGO_MANIFEST_DIR: {e}")))?;
    let full_path = PathBuf::from(manifest_dir).join(path_lit.value());

    let raw = std::fs::read(&full_path).map_err(|e| {
        syn::Error::new(path_lit.span(), format!("failed to read {}: {e}", full_path.display()))
    })?;
    let packed = rle::encode(&raw).map_err(|e| syn::Error::new(path_lit.span(), e))?;

    let full_path = full_path.to_string_lossy().into_owned();
    Ok(quote! {
        {
            // rebuild when the asset changes
            const _: &[u8] = include_bytes!(#full_path);
            const RLE: ::nes::rle::Rle<'static> = match ::nes::rle::Rle::new(&[#(#packed),*]) {
                Ok(rle) => rle,
                Err(_) => panic!("include_rle! produced an invalid stream"),
            };
            RLE
        }
    })
}
