//! Typed route parameters
//!
//! A route declares its parameters as [`ParamName`]s at build time; requests
//! and static-path declarations carry values as [`Params`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A parameter declared by a route, in left-to-right capture order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamName {
    /// Name without the `...` prefix
    pub name: String,
    /// Declared as `[...name]`
    pub rest: bool,
}

impl ParamName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rest: false,
        }
    }

    pub fn rest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rest: true,
        }
    }
}

impl fmt::Display for ParamName {
    /// Renders the name the way it appears in the file name
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rest {
            write!(f, "...{}", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A parameter value, or the absence of one
///
/// Rest parameters are optional: `/docs` matches `docs/[...path]` with
/// `path` unset. Empty strings normalize to [`ParamValue::Unset`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ParamValue {
    Set(String),
    Unset,
}

impl ParamValue {
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            ParamValue::Set(value) => Some(value),
            ParamValue::Unset => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, ParamValue::Set(_))
    }
}

impl From<Option<String>> for ParamValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) if !value.is_empty() => ParamValue::Set(value),
            _ => ParamValue::Unset,
        }
    }
}

impl From<ParamValue> for Option<String> {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Set(value) => Some(value),
            ParamValue::Unset => None,
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Some(value).into()
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

/// Parameter map keyed by name
///
/// Equality ignores the difference between a missing key and an explicit
/// [`ParamValue::Unset`], so `{ page: Unset }` equals `{}`.
///
/// # Examples
///
/// ```
/// use rhtmx_manifest::Params;
///
/// let params = Params::new().with("slug", "hello").with("page", "");
/// assert_eq!(params.get("slug"), Some("hello"));
/// assert_eq!(params.get("page"), None);
/// assert_eq!(params, Params::new().with("slug", "hello"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style explicit unset
    pub fn with_unset(mut self, name: impl Into<String>) -> Self {
        self.insert(name, ParamValue::Unset);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Value of a set parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(ParamValue::as_deref)
    }

    /// Raw entry, distinguishing "declared but unset" from "absent"
    pub fn value(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of parameters that carry a value
    pub fn len(&self) -> usize {
        self.values.values().filter(|value| value.is_set()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn set_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
    }
}

impl PartialEq for Params {
    fn eq(&self, other: &Self) -> bool {
        self.set_entries().eq(other.set_entries())
    }
}

impl Eq for Params {}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_is_unset() {
        let params = Params::new().with("page", "");
        assert_eq!(params.value("page"), Some(&ParamValue::Unset));
        assert!(!params.is_set("page"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_equality_ignores_unset_entries() {
        let a = Params::new().with("slug", "a").with_unset("rest");
        let b = Params::new().with("slug", "a");
        assert_eq!(a, b);
        assert_ne!(a, Params::new().with("slug", "b"));
    }

    #[test]
    fn test_param_name_display() {
        assert_eq!(ParamName::new("slug").to_string(), "slug");
        assert_eq!(ParamName::rest("path").to_string(), "...path");
    }

    #[test]
    fn test_from_iter() {
        let params: Params = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("b"), Some("2"));
    }
}
