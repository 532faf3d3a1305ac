//! Submitted request parameters.
//!
//! Parameters are keyed by the bound (dotted) field name. Values are JSON so a
//! multi-valued key can carry an array.

use std::collections::HashMap;

use serde_json::Value as Json;

/// Submitted form parameters, the sole input channel for `extract`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<String, Json>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    ///
    /// Repeated keys are collected into an array in submission order.
    pub fn from_urlencoded(body: &str) -> Self {
        let mut params = Params::new();
        for pair in body.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.append(decode_component(key), decode_component(value));
        }
        params
    }

    /// Set a parameter, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Json>) -> Option<Json> {
        self.values.insert(name.into(), value.into())
    }

    /// Add a value, turning the entry into an array if the key already exists.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<Json>) {
        let value = value.into();
        match self.values.entry(name.into()) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
            }
            std::collections::hash_map::Entry::Occupied(mut slot) => match slot.get_mut() {
                Json::Array(items) => items.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Json::Array(vec![first, value]);
                }
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&Json> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Json>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
