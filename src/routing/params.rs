//! Captured URL parameters.

use std::collections::BTreeMap;

/// One captured wildcard: its name from the pattern and its value from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'k, 'v> {
    pub key: &'k [u8],
    pub value: &'v [u8],
}

/// Parameters captured by a lookup, in left-to-right pattern order.
///
/// Keys borrow from the tree, values from the request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params<'k, 'v> {
    inner: Vec<Param<'k, 'v>>,
}

impl<'k, 'v> Params<'k, 'v> {
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    pub(crate) fn push(&mut self, key: &'k [u8], value: &'v [u8]) {
        self.inner.push(Param { key, value });
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param<'k, 'v>> {
        self.inner.iter()
    }

    /// Value of the first parameter named `name`.
    pub fn get(&self, name: &str) -> Option<&'v [u8]> {
        self.inner
            .iter()
            .find(|p| p.key == name.as_bytes())
            .map(|p| p.value)
    }

    /// UTF-8 view of [`Params::get`]. Non UTF-8 values yield `None`.
    pub fn get_str(&self, name: &str) -> Option<&'v str> {
        self.get(name).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Detach from the tree and path lifetimes.
    pub fn to_url_params(&self) -> UrlParams {
        UrlParams(
            self.inner
                .iter()
                .map(|p| {
                    (
                        String::from_utf8_lossy(p.key).into_owned(),
                        String::from_utf8_lossy(p.value).into_owned(),
                    )
                })
                .collect(),
        )
    }
}

impl<'a, 'k, 'v> IntoIterator for &'a Params<'k, 'v> {
    type Item = &'a Param<'k, 'v>;
    type IntoIter = std::slice::Iter<'a, Param<'k, 'v>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// Owned parameters, stored in request extensions for endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams(pub Vec<(String, String)>);

impl UrlParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Name to value map. A repeated name keeps its first value.
    pub fn to_map(&self) -> BTreeMap<&str, &str> {
        let mut map = BTreeMap::new();
        for (k, v) in &self.0 {
            map.entry(k.as_str()).or_insert(v.as_str());
        }
        map
    }
}
