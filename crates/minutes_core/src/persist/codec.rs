//! Serialization strategies for the two supported collection shapes.
//!
//! # Invariants
//! - The set of storage kinds is closed: [`StorageKind::UniqueSet`] and
//!   [`StorageKind::KeyValueMap`].
//! - Decoding a unique set never fails because of duplicates; repeats are
//!   dropped.

use im::{OrdMap, OrdSet};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::str::FromStr;

/// Semantic shape of a persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Stored as a JSON array, held in memory as a set.
    UniqueSet,
    /// Stored as a JSON object, held in memory as a map.
    KeyValueMap,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UniqueSet => "unique_set",
            Self::KeyValueMap => "key_value_map",
        }
    }
}

impl Display for StorageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized storage kind name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStorageKind(pub String);

impl FromStr for StorageKind {
    type Err = UnknownStorageKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unique_set" | "set" => Ok(Self::UniqueSet),
            "key_value_map" | "map" => Ok(Self::KeyValueMap),
            _ => Err(UnknownStorageKind(value.to_string())),
        }
    }
}

/// Paired encode/decode strategy for one collection shape.
pub trait CollectionCodec {
    type Value: Clone;

    /// Shape this codec stores.
    fn kind(&self) -> StorageKind;

    fn encode(&self, value: &Self::Value) -> serde_json::Result<Value>;

    fn decode(&self, raw: Value) -> serde_json::Result<Self::Value>;
}

/// Codec for unique-element collections.
///
/// Encodes to an array in iteration order; decodes into an [`OrdSet`].
#[derive(Debug)]
pub struct UniqueSetCodec<E>(PhantomData<fn() -> E>);

impl<E> UniqueSetCodec<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for UniqueSetCodec<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for UniqueSetCodec<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> CollectionCodec for UniqueSetCodec<E>
where
    E: Ord + Clone + Serialize + DeserializeOwned,
{
    type Value = OrdSet<E>;

    fn kind(&self) -> StorageKind {
        StorageKind::UniqueSet
    }

    fn encode(&self, value: &Self::Value) -> serde_json::Result<Value> {
        serde_json::to_value(value.iter().collect::<Vec<_>>())
    }

    fn decode(&self, raw: Value) -> serde_json::Result<Self::Value> {
        let items: Vec<E> = serde_json::from_value(raw)?;
        Ok(items.into_iter().collect())
    }
}

/// Codec for key/value maps. Identity over the JSON object form.
#[derive(Debug)]
pub struct KeyValueMapCodec<K, V>(PhantomData<fn() -> (K, V)>);

impl<K, V> KeyValueMapCodec<K, V> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K, V> Default for KeyValueMapCodec<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for KeyValueMapCodec<K, V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<K, V> CollectionCodec for KeyValueMapCodec<K, V>
where
    K: Ord + Clone + Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    type Value = OrdMap<K, V>;

    fn kind(&self) -> StorageKind {
        StorageKind::KeyValueMap
    }

    fn encode(&self, value: &Self::Value) -> serde_json::Result<Value> {
        serde_json::to_value(value.iter().collect::<BTreeMap<_, _>>())
    }

    fn decode(&self, raw: Value) -> serde_json::Result<Self::Value> {
        let entries: BTreeMap<K, V> = serde_json::from_value(raw)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{CollectionCodec, KeyValueMapCodec, StorageKind, UniqueSetCodec};
    use im::{OrdMap, OrdSet};
    use serde_json::json;

    #[test]
    fn storage_kind_parses_names_and_aliases() {
        assert_eq!("unique_set".parse::<StorageKind>(), Ok(StorageKind::UniqueSet));
        assert_eq!(" Map ".parse::<StorageKind>(), Ok(StorageKind::KeyValueMap));
        assert!("list".parse::<StorageKind>().is_err());
    }

    #[test]
    fn unique_set_decode_drops_duplicates() {
        let codec = UniqueSetCodec::<String>::new();
        let decoded = codec.decode(json!(["@rsc", "@rsc", "@spf13"])).unwrap();
        assert_eq!(decoded.len(), 2);
        assert!(decoded.contains("@rsc"));
    }

    #[test]
    fn unique_set_encodes_as_array() {
        let codec = UniqueSetCodec::<u32>::new();
        let set: OrdSet<u32> = [3u32, 1, 2].into_iter().collect();
        assert_eq!(codec.encode(&set).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn map_codec_uses_string_keys_on_disk() {
        let codec = KeyValueMapCodec::<u32, String>::new();
        let map: OrdMap<u32, String> = [(20u32, "x".to_string())].into_iter().collect();
        let encoded = codec.encode(&map).unwrap();
        assert_eq!(encoded, json!({ "20": "x" }));
        assert_eq!(codec.decode(encoded).unwrap(), map);
    }

    #[test]
    fn map_codec_rejects_non_object_input() {
        let codec = KeyValueMapCodec::<u32, String>::new();
        assert!(codec.decode(json!(["not", "a", "map"])).is_err());
    }
}
