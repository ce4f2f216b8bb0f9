//! `#[derive(Params)]` implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Fields, GenericArgument, PathArguments, Type, parse2};

/// Struct-level options parsed from `#[param(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct ParamsStructOptions {
    /// Rename all fields using the given case convention.
    rename_all: Option<RenameRule>,
}

/// Case conversion rules for `rename_all`.
#[derive(Debug, Clone, Copy)]
enum RenameRule {
    /// `lowercase`
    Lower,
    /// `camelCase`
    Camel,
    /// `snake_case`
    Snake,
    /// `kebab-case`
    Kebab,
}

impl RenameRule {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "lowercase" => Some(Self::Lower),
            "camelCase" => Some(Self::Camel),
            "snake_case" => Some(Self::Snake),
            "kebab-case" => Some(Self::Kebab),
            _ => None,
        }
    }

    /// Apply the rule to a `snake_case` Rust field name.
    fn apply(self, field: &str) -> String {
        match self {
            Self::Lower => field.replace('_', "").to_lowercase(),
            Self::Camel => to_camel_case(field),
            Self::Snake => field.to_string(),
            Self::Kebab => field.replace('_', "-"),
        }
    }
}

/// `post_ids` -> `postIds`, `account_ids` -> `accountIds`.
fn to_camel_case(field: &str) -> String {
    let mut words = field.split('_').filter(|w| !w.is_empty());
    let mut out = words.next().map(str::to_string).unwrap_or_default();
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Field options parsed from `#[param(...)]` attributes.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default)]
struct ParamsFieldOptions {
    /// Explicit wire name.
    rename: Option<syn::LitStr>,
    /// Skip zero values.
    omit_empty: bool,
    /// Sequence field, one key per element.
    indexed: bool,
    /// Key prefix for an indexed field, defaulting to the wire name.
    indexed_name: Option<syn::LitStr>,
    /// Key part after the index.
    suffix: Option<syn::LitStr>,
    /// Splice a nested `ToParams` value.
    flatten: bool,
    /// Never encode this field.
    skip: bool,
}

/// How a field is encoded, decided from its type and options.
enum FieldKind {
    Scalar,
    Optional,
    Sequence { optional: bool },
    Flatten { optional: bool },
    Skip,
}

/// Expand the `#[derive(Params)]` macro.
pub fn expand_params_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let struct_options = parse_struct_options(&input.attrs)?;

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Params derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Params derive only supports structs",
            ));
        }
    };

    let mut field_handlers = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_field_options(&field.attrs)?;
        let kind = field_kind(field, &options)?;

        // explicit rename > rename_all > field name
        let key = if let Some(ref rename) = options.rename {
            rename.value()
        } else if let Some(rule) = struct_options.rename_all {
            rule.apply(&field_name.to_string())
        } else {
            field_name.to_string()
        };

        field_handlers.push(generate_field_handler(field_name, &key, &options, &kind));
    }

    Ok(quote! {
        impl #impl_generics ::typetalk::ToParams for #name #ty_generics #where_clause {
            fn to_params(&self) -> ::typetalk::Result<::typetalk::Params> {
                let mut params = ::typetalk::Params::new();
                #(#field_handlers)*
                ::core::result::Result::Ok(params)
            }
        }
    })
}

/// Parse struct-level options from `#[param(...)]` attributes.
fn parse_struct_options(attrs: &[syn::Attribute]) -> syn::Result<ParamsStructOptions> {
    let mut options = ParamsStructOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("param") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: syn::LitStr = meta.value()?.parse()?;
                let rule = RenameRule::parse(&value.value()).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &value,
                        format!(
                            "unknown rename_all value: \"{}\". Expected one of: \
                             lowercase, camelCase, snake_case, kebab-case",
                            value.value()
                        ),
                    )
                })?;
                options.rename_all = Some(rule);
                Ok(())
            } else {
                Err(meta.error("unknown struct-level param attribute"))
            }
        })?;
    }

    Ok(options)
}

/// Parse field options from `#[param(...)]` attributes.
fn parse_field_options(attrs: &[syn::Attribute]) -> syn::Result<ParamsFieldOptions> {
    let mut options = ParamsFieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("param") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("omit_empty") {
                options.omit_empty = true;
            } else if meta.path.is_ident("flatten") {
                options.flatten = true;
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else if meta.path.is_ident("rename") {
                options.rename = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("suffix") {
                options.suffix = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("indexed") {
                options.indexed = true;
                if meta.input.peek(syn::Token![=]) {
                    options.indexed_name = Some(meta.value()?.parse()?);
                }
            } else {
                return Err(meta.error("unknown param attribute"));
            }
            Ok(())
        })?;
    }

    Ok(options)
}

/// Decide how a field is encoded, rejecting inconsistent declarations.
fn field_kind(field: &syn::Field, options: &ParamsFieldOptions) -> syn::Result<FieldKind> {
    let ty = &field.ty;
    let optional_inner = option_inner(ty);
    let is_sequence = is_vec_type(ty) || optional_inner.is_some_and(is_vec_type);

    if options.skip {
        return Ok(FieldKind::Skip);
    }

    if options.flatten {
        if options.rename.is_some() || options.indexed || options.omit_empty {
            return Err(syn::Error::new_spanned(
                field,
                "`flatten` cannot be combined with `rename`, `indexed` or `omit_empty`",
            ));
        }
        return Ok(FieldKind::Flatten {
            optional: optional_inner.is_some(),
        });
    }

    if options.suffix.is_some() && !options.indexed {
        return Err(syn::Error::new_spanned(
            field,
            "`suffix` only applies to `indexed` fields",
        ));
    }

    match (is_sequence, options.indexed) {
        (true, true) => Ok(FieldKind::Sequence {
            optional: optional_inner.is_some(),
        }),
        (true, false) => Err(syn::Error::new_spanned(
            ty,
            "sequence fields need #[param(indexed)] so each element gets its own key \
             (e.g. `fileKeys[0]`, `fileKeys[1]`)",
        )),
        (false, true) => Err(syn::Error::new_spanned(
            ty,
            "#[param(indexed)] requires a `Vec<T>` or `Option<Vec<T>>` field",
        )),
        (false, false) if optional_inner.is_some() => Ok(FieldKind::Optional),
        (false, false) => Ok(FieldKind::Scalar),
    }
}

/// Generate code for encoding a single field.
fn generate_field_handler(
    field_name: &syn::Ident,
    key: &str,
    options: &ParamsFieldOptions,
    kind: &FieldKind,
) -> TokenStream {
    let omit_empty = options.omit_empty;

    match kind {
        FieldKind::Skip => TokenStream::new(),
        FieldKind::Scalar => quote! {
            params.push_field(#key, &self.#field_name, #omit_empty)?;
        },
        FieldKind::Optional => quote! {
            params.push_optional(#key, self.#field_name.as_ref())?;
        },
        FieldKind::Sequence { optional } => {
            let name = options
                .indexed_name
                .as_ref()
                .map_or_else(|| key.to_string(), syn::LitStr::value);
            let suffix = options
                .suffix
                .as_ref()
                .map(syn::LitStr::value)
                .unwrap_or_default();
            let param_key = quote! {
                ::typetalk::ParamKey::Indexed { name: #name, suffix: #suffix }
            };

            if *optional {
                quote! {
                    if let ::core::option::Option::Some(values) = &self.#field_name {
                        params.push_indexed(#param_key, values.as_slice())?;
                    }
                }
            } else {
                quote! {
                    params.push_indexed(#param_key, self.#field_name.as_slice())?;
                }
            }
        }
        FieldKind::Flatten { optional } => {
            if *optional {
                quote! {
                    if let ::core::option::Option::Some(value) = &self.#field_name {
                        params.push_flattened(value)?;
                    }
                }
            } else {
                quote! {
                    params.push_flattened(&self.#field_name)?;
                }
            }
        }
    }
}

/// The `T` of an `Option<T>` type.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

/// Check if a type is `Vec<T>`.
fn is_vec_type(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path)
        if type_path.path.segments.last()
            .is_some_and(|seg| seg.ident == "Vec"))
}
