//! Form-encoded parameters in Stripe's bracket notation.
//!
//! Stripe takes `application/x-www-form-urlencoded` bodies with nested keys
//! written as `metadata[order_id]` and list items as `expand[0]`.

use std::collections::BTreeMap;

/// Ordered key/value pairs ready for `reqwest::RequestBuilder::form`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Skips the pair when `value` is `None`.
    pub fn push_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// `key[0]=a&key[1]=b`
    pub fn push_list<V: ToString>(mut self, key: &str, values: &[V]) -> Self {
        for (i, value) in values.iter().enumerate() {
            self.pairs.push((format!("{}[{}]", key, i), value.to_string()));
        }
        self
    }

    /// `key[k]=v` for every entry.
    pub fn push_map(mut self, key: &str, values: &BTreeMap<String, String>) -> Self {
        for (k, v) in values {
            self.pairs.push((format!("{}[{}]", key, k), v.clone()));
        }
        self
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
