//! Request parameter encoding.
//!
//! An options value is turned into an ordered [`Params`] set, which is then
//! used as a URL query string ([`add_queries`], [`set_query`]) or as an
//! `application/x-www-form-urlencoded` body ([`crate::to_form`]).
//!
//! Options types normally implement [`ToParams`] through `#[derive(Params)]`,
//! which generates calls to the `push_*` methods below in field order.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone};
use url::Url;
use url::form_urlencoded;

use crate::{Error, Result};

// ============================================================================
// Keys
// ============================================================================

/// Wire name of a parameter.
///
/// Sequence fields use [`ParamKey::Indexed`], which expands to
/// `name[0]suffix`, `name[1]suffix`, ... (e.g. `fileKeys[0]` or
/// `attachments[0].fileUrl`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// A single key.
    Plain(&'static str),
    /// One key per sequence element.
    Indexed {
        /// Key prefix before the index.
        name: &'static str,
        /// Key part after the index, often empty.
        suffix: &'static str,
    },
}

impl ParamKey {
    /// An indexed key without suffix.
    #[must_use]
    pub const fn indexed(name: &'static str) -> Self {
        Self::Indexed { name, suffix: "" }
    }

    /// The key used for the element at `index`.
    ///
    /// A plain key ignores the index.
    #[must_use]
    pub fn at(&self, index: usize) -> String {
        match self {
            Self::Plain(name) => (*name).to_string(),
            Self::Indexed { name, suffix } => format!("{name}[{index}]{suffix}"),
        }
    }

    /// Returns `true` for [`ParamKey::Indexed`].
    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed { .. })
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(name) => write!(f, "{name}"),
            Self::Indexed { name, suffix } => write!(f, "{name}[]{suffix}"),
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// A value with a canonical text form for query strings and form bodies.
pub trait ParamValue {
    /// Render the value.
    ///
    /// Returns an error message when the value has no canonical form.
    fn to_param_value(&self) -> std::result::Result<String, String>;

    /// Whether this is the type's zero value (skipped by `omit_empty` fields).
    fn is_empty_value(&self) -> bool;
}

impl<T: ParamValue + ?Sized> ParamValue for &T {
    fn to_param_value(&self) -> std::result::Result<String, String> {
        (**self).to_param_value()
    }

    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl ParamValue for str {
    fn to_param_value(&self) -> std::result::Result<String, String> {
        Ok(self.to_string())
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl ParamValue for String {
    fn to_param_value(&self) -> std::result::Result<String, String> {
        Ok(self.clone())
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl ParamValue for bool {
    fn to_param_value(&self) -> std::result::Result<String, String> {
        Ok(if *self { "true" } else { "false" }.to_string())
    }

    fn is_empty_value(&self) -> bool {
        !*self
    }
}

impl ParamValue for char {
    fn to_param_value(&self) -> std::result::Result<String, String> {
        Ok(self.to_string())
    }

    fn is_empty_value(&self) -> bool {
        *self == '\0'
    }
}

macro_rules! impl_param_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParamValue for $ty {
                fn to_param_value(&self) -> std::result::Result<String, String> {
                    Ok(self.to_string())
                }

                fn is_empty_value(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_param_value_int!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

macro_rules! impl_param_value_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParamValue for $ty {
                fn to_param_value(&self) -> std::result::Result<String, String> {
                    if self.is_finite() {
                        Ok(self.to_string())
                    } else {
                        Err(format!("non-finite number {self}"))
                    }
                }

                fn is_empty_value(&self) -> bool {
                    *self == 0.0
                }
            }
        )*
    };
}

impl_param_value_float!(f32, f64);

impl<Tz> ParamValue for DateTime<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    fn to_param_value(&self) -> std::result::Result<String, String> {
        Ok(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    fn is_empty_value(&self) -> bool {
        false
    }
}

impl ParamValue for NaiveDate {
    fn to_param_value(&self) -> std::result::Result<String, String> {
        Ok(self.format("%Y-%m-%d").to_string())
    }

    fn is_empty_value(&self) -> bool {
        false
    }
}

// ============================================================================
// Parameter Set
// ============================================================================

/// Types that can be encoded into a [`Params`] set.
///
/// This is automatically implemented by the `#[derive(Params)]` macro.
///
/// # Example
///
/// ```ignore
/// use typetalk::Params;
///
/// #[derive(Params)]
/// #[param(rename_all = "camelCase")]
/// struct PostMessageOptions {
///     #[param(omit_empty)]
///     reply_to: u64,
///     #[param(indexed, omit_empty)]
///     file_keys: Vec<String>,
///     #[param(indexed = "attachments", suffix = ".fileUrl", omit_empty)]
///     file_urls: Vec<String>,
/// }
/// ```
pub trait ToParams {
    /// Encode this value.
    fn to_params(&self) -> Result<Params>;
}

impl<T: ToParams + ?Sized> ToParams for &T {
    fn to_params(&self) -> Result<Params> {
        (**self).to_params()
    }
}

/// Ordered set of encoded request parameters.
///
/// Pairs keep the order in which they were pushed. The `push_*` methods
/// reject a key that is already present; [`Params::parse`] and
/// [`FromIterator`] take pairs as-is.
#[derive(Debug, Clone, Default)]
pub struct Params {
    pairs: Vec<(String, String)>,
    keys: HashSet<String>,
}

impl PartialEq for Params {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl Eq for Params {}

impl Params {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` string.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        form_urlencoded::parse(input.as_bytes())
            .into_owned()
            .collect()
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` when there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Value of the first pair with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if a pair with the given key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Iterate over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consume into the underlying pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

    /// Append a raw pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        if !self.keys.insert(key.clone()) {
            return Err(Error::encoding(key, "duplicate parameter key"));
        }
        self.pairs.push((key, value.into()));
        Ok(())
    }

    /// Append a value under `key`.
    pub fn push_value<V: ParamValue + ?Sized>(&mut self, key: &str, value: &V) -> Result<()> {
        let value = value
            .to_param_value()
            .map_err(|message| Error::encoding(key, message))?;
        self.push(key, value)
    }

    /// Append a scalar field, skipping zero values when `omit_empty` is set.
    pub fn push_field<V: ParamValue + ?Sized>(
        &mut self,
        key: &str,
        value: &V,
        omit_empty: bool,
    ) -> Result<()> {
        if omit_empty && value.is_empty_value() {
            return Ok(());
        }
        self.push_value(key, value)
    }

    /// Append an optional field.
    ///
    /// `None` is skipped. `Some(v)` is always encoded, zero values included:
    /// the zero value of an optional field is `None`.
    pub fn push_optional<V: ParamValue>(&mut self, key: &str, value: Option<&V>) -> Result<()> {
        match value {
            Some(value) => self.push_value(key, value),
            None => Ok(()),
        }
    }

    /// Append one pair per element, keyed by `key.at(index)`.
    pub fn push_indexed<V: ParamValue>(&mut self, key: ParamKey, values: &[V]) -> Result<()> {
        for (index, value) in values.iter().enumerate() {
            self.push_value(&key.at(index), value)?;
        }
        Ok(())
    }

    /// Append all pairs of a nested options value.
    pub fn push_flattened<T: ToParams + ?Sized>(&mut self, value: &T) -> Result<()> {
        for (key, value) in value.to_params()? {
            self.push(key, value)?;
        }
        Ok(())
    }

    /// Canonical `application/x-www-form-urlencoded` form.
    #[must_use]
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl ToParams for Params {
    fn to_params(&self) -> Result<Params> {
        Ok(self.clone())
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let pairs: Vec<(String, String)> = iter.into_iter().collect();
        let keys = pairs.iter().map(|(key, _)| key.clone()).collect();
        Self { pairs, keys }
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

// ============================================================================
// URL helpers
// ============================================================================

/// Replace the query of `url` with the encoded parameters.
///
/// An empty set removes the query entirely.
pub fn set_query(url: &mut Url, params: &Params) {
    if params.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&params.encode()));
    }
}

/// Append encoded options to an absolute URL as its query string.
///
/// With `None` the base is returned unchanged without being parsed.
/// Otherwise any existing query is replaced.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if `base` cannot be parsed, or
/// [`Error::Encoding`] if a value has no canonical form.
///
/// # Example
///
/// ```
/// use typetalk_core::{Params, add_queries};
///
/// let mut params = Params::new();
/// params.push("q", "rust").expect("push");
///
/// let url = add_queries("https://typetalk.com/api/v1/search", Some(&params)).expect("url");
/// assert_eq!(url, "https://typetalk.com/api/v1/search?q=rust");
///
/// let url = add_queries::<Params>("https://typetalk.com/api/v1/search", None).expect("url");
/// assert_eq!(url, "https://typetalk.com/api/v1/search");
/// ```
pub fn add_queries<T: ToParams + ?Sized>(base: &str, opts: Option<&T>) -> Result<String> {
    let Some(opts) = opts else {
        return Ok(base.to_string());
    };

    let mut url = Url::parse(base)?;
    let params = opts.to_params()?;
    set_query(&mut url, &params);
    Ok(url.into())
}
