//! Procedural macros for the Typetalk API client.
//!
//! - `#[derive(Params)]` - Encode an options struct into request parameters
//!
//! Use it through the `typetalk` crate, which re-exports it next to the
//! `ToParams` trait the generated code implements.

mod params_derive;

use proc_macro::TokenStream;

/// Derive `ToParams` for an options struct.
///
/// Fields are encoded in declaration order. `Option` fields are skipped when
/// `None`.
///
/// # Struct attributes
///
/// - `#[param(rename_all = "camelCase")]` - Rename every field
///   (`lowercase`, `camelCase`, `snake_case`, `kebab-case`)
///
/// # Field attributes
///
/// - `#[param(rename = "name")]` - Use a custom wire name
/// - `#[param(omit_empty)]` - Skip zero values (`0`, `""`, `false`); on an
///   `Option` field only `None` is skipped and `Some(false)` is still sent
/// - `#[param(indexed)]` / `#[param(indexed = "name")]` - Encode a `Vec` as
///   `name[0]`, `name[1]`, ...
/// - `#[param(suffix = ".fileUrl")]` - Append a suffix after the index,
///   giving `name[0].fileUrl`
/// - `#[param(flatten)]` - Splice the parameters of a nested struct
/// - `#[param(skip)]` - Never encode the field
///
/// A `Vec` field without `indexed` is rejected at compile time.
///
/// # Example
///
/// ```ignore
/// #[derive(Params)]
/// #[param(rename_all = "camelCase")]
/// struct CreateTopicOptions {
///     name: String,
///     #[param(omit_empty)]
///     space_key: String,
///     #[param(indexed = "addAccountIds")]
///     account_ids: Vec<u64>,
/// }
/// // name=dev&spaceKey=abc&addAccountIds[0]=1&addAccountIds[1]=2
/// ```
#[proc_macro_derive(Params, attributes(param))]
pub fn derive_params(input: TokenStream) -> TokenStream {
    params_derive::expand_params_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
