use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Metadata;

/// Request-scoped routing tags for one logical call chain.
///
/// A tag maps each key to an ordered list of string values (insertion
/// order is preserved within a key), plus an auxiliary key→value data
/// payload that travels with the chain but does not drive routing.
///
/// Exactly one `TrafficTag` is active per call chain at any instant on a
/// given worker; the propagation layer in `graymesh-core` installs and
/// restores it around execution-unit handoffs.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficTag {
    /// Routing tags: key → ordered values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tags: BTreeMap<String, Vec<String>>,
    /// Auxiliary chain-scoped data, not consulted by routing.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    data: Metadata,
}

impl TrafficTag {
    /// Create an empty tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the tag carries neither tag values nor data.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.data.is_empty()
    }

    /// All values recorded under `key`, in insertion order.
    pub fn tag_values(&self, key: &str) -> &[String] {
        self.tags.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// First value recorded under `key`, if any.
    pub fn first_value(&self, key: &str) -> Option<&str> {
        self.tags.get(key).and_then(|v| v.first()).map(|s| s.as_str())
    }

    /// Replace all values under `key`.
    pub fn put_tag<K, I, V>(&mut self, key: K, values: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.tags
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Append one value under `key`, keeping existing values.
    pub fn add_tag_value<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.tags.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Iterate over tag keys.
    pub fn tag_keys(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(|k| k.as_str())
    }

    /// Auxiliary data payload.
    pub fn data(&self) -> &Metadata {
        &self.data
    }

    /// Insert an auxiliary data entry.
    pub fn put_data<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.data.insert(key, value);
        self
    }

    /// Merge an incoming tag into this one.
    ///
    /// Incoming tag values replace existing values key-by-key; incoming
    /// data entries overwrite colliding keys. Keys absent from `other`
    /// are left untouched.
    pub fn merge(&mut self, other: &TrafficTag) -> &mut Self {
        for (k, v) in &other.tags {
            self.tags.insert(k.clone(), v.clone());
        }
        for (k, v) in other.data.iter() {
            self.data.insert(k, v);
        }
        self
    }
}
