//! Wire payloads and the normalizer that strips absent fields.
//!
//! # Design
//! Parameter builders describe every field they know about, supplied or not,
//! as a `Payload`. An optional field the caller left unset becomes
//! `Entry::Absent`, which is distinct from JSON `null`, `false`, `0` and
//! `""`. `normalize` then drops absent keys at every map depth so they are
//! never sent. Sequences are opaque to the normalizer: whatever they hold is
//! passed through unchanged.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

/// A single value in a `Payload`.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// No value was supplied.
    Absent,
    /// Any JSON value, including caller-supplied objects, which are leaves.
    Value(Value),
    /// A nested payload, normalized recursively.
    Map(Payload),
    /// An ordered sequence, never normalized.
    List(Vec<Entry>),
}

impl Entry {
    pub fn is_absent(&self) -> bool {
        matches!(self, Entry::Absent)
    }

    /// JSON form. `Absent` renders as `null`, which only happens for absent
    /// entries inside sequences once a payload is normalized.
    pub fn to_json(&self) -> Value {
        match self {
            Entry::Absent => Value::Null,
            Entry::Value(value) => value.clone(),
            Entry::Map(payload) => payload.to_json(),
            Entry::List(items) => Value::Array(items.iter().map(Entry::to_json).collect()),
        }
    }
}

/// A string-keyed nested structure with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(BTreeMap<String, Entry>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Entry>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Entry>) -> Option<Entry> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.0.iter()
    }

    /// See [`normalize`].
    pub fn normalize(&self) -> Payload {
        normalize(self)
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(key, entry)| (key.clone(), entry.to_json()))
                .collect(),
        )
    }
}

/// Return a copy of `payload` without absent-valued keys.
///
/// Nested maps are normalized before inclusion; a nested map that ends up
/// empty is kept. Sequences and plain values are copied as they are.
pub fn normalize(payload: &Payload) -> Payload {
    payload
        .0
        .iter()
        .filter_map(|(key, entry)| match entry {
            Entry::Absent => None,
            Entry::Map(nested) => Some((key.clone(), Entry::Map(normalize(nested)))),
            other => Some((key.clone(), other.clone())),
        })
        .collect()
}

impl FromIterator<(String, Entry)> for Payload {
    fn from_iter<I: IntoIterator<Item = (String, Entry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, entry) in &self.0 {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Entry::Absent => serializer.serialize_none(),
            Entry::Value(value) => value.serialize(serializer),
            Entry::Map(payload) => payload.serialize(serializer),
            Entry::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl<T: Into<Entry>> From<Option<T>> for Entry {
    fn from(value: Option<T>) -> Self {
        value.map_or(Entry::Absent, Into::into)
    }
}

impl From<Payload> for Entry {
    fn from(payload: Payload) -> Self {
        Entry::Map(payload)
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Value(value)
    }
}

impl From<serde_json::Map<String, Value>> for Entry {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Entry::Value(Value::Object(map))
    }
}

impl<T: Into<Entry>> From<Vec<T>> for Entry {
    fn from(items: Vec<T>) -> Self {
        Entry::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Entry {
    fn from(value: &str) -> Self {
        Entry::Value(Value::String(value.to_string()))
    }
}

macro_rules! entry_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Entry {
                fn from(value: $ty) -> Self {
                    Entry::Value(Value::from(value))
                }
            }
        )*
    };
}

entry_from_scalar!(String, bool, i32, i64, u32, u64, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Payload {
        Payload::new()
            .with("plan", "prod_1")
            .with("key", Entry::Absent)
            .with("unlocked", false)
            .with("amount", 0)
            .with("email", "")
            .with(
                "subscription",
                Payload::new()
                    .with("cancel_at_period_end", true)
                    .with("pause_collection", Entry::Absent),
            )
            .with("roles", vec![Entry::from("admin"), Entry::Absent])
    }

    #[test]
    fn removes_absent_keys_at_top_level() {
        let normalized = normalize(&sample());
        assert!(!normalized.contains_key("key"));
        assert!(normalized.contains_key("plan"));
    }

    #[test]
    fn keeps_falsy_values() {
        let json = normalize(&sample()).to_json();
        assert_eq!(json["unlocked"], false);
        assert_eq!(json["amount"], 0);
        assert_eq!(json["email"], "");
    }

    #[test]
    fn recurses_into_nested_maps() {
        let json = normalize(&sample()).to_json();
        assert_eq!(json["subscription"], json!({"cancel_at_period_end": true}));
    }

    #[test]
    fn sequences_pass_through_untouched() {
        let normalized = normalize(&sample());
        assert_eq!(
            normalized.get("roles"),
            Some(&Entry::List(vec![Entry::from("admin"), Entry::Absent]))
        );
        assert_eq!(normalized.to_json()["roles"], json!(["admin", null]));
    }

    #[test]
    fn maps_inside_sequences_are_not_normalized() {
        let payload = Payload::new().with(
            "links",
            vec![Payload::new().with("title", "Docs").with("href", Entry::Absent)],
        );
        let normalized = normalize(&payload);
        let Some(Entry::List(items)) = normalized.get("links") else {
            panic!("links should survive as a list");
        };
        let Entry::Map(link) = &items[0] else {
            panic!("link should stay a map");
        };
        assert!(link.contains_key("href"));
    }

    #[test]
    fn empty_nested_map_survives() {
        let payload = Payload::new().with(
            "integrations",
            Payload::new()
                .with("discord", Entry::Absent)
                .with("telegram", Entry::Absent),
        );
        assert_eq!(normalize(&payload).to_json(), json!({"integrations": {}}));
    }

    #[test]
    fn explicit_null_is_kept() {
        let payload = Payload::new().with("metadata", json!({"hwid": null}));
        assert_eq!(
            normalize(&payload).to_json(),
            json!({"metadata": {"hwid": null}})
        );
    }

    #[test]
    fn is_idempotent() {
        let once = normalize(&sample());
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn does_not_mutate_input() {
        let input = sample();
        let before = input.clone();
        let _ = normalize(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn option_maps_to_absent_or_value() {
        assert!(Entry::from(None::<String>).is_absent());
        assert_eq!(Entry::from(Some(3u32)), Entry::Value(json!(3)));
    }

    #[test]
    fn serializes_like_to_json() {
        let normalized = normalize(&sample());
        assert_eq!(serde_json::to_value(&normalized).unwrap(), normalized.to_json());
    }
}
