//! Typed application state carried by charms.

use core::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("duplicate map key: {0}")]
    DuplicateKey(String),
}

/// Closed set of values an application can store under its tag.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(tag = "type", content = "value")]
pub enum Data {
    #[default]
    Empty,
    Bool(bool),
    U64(u64),
    I64(i64),
    Bytes(#[serde(with = "crate::hexutil::hex_vec")] Vec<u8>),
    String(String),
    List(Vec<Data>),
    Map(DataMap),
}

impl Data {
    pub fn bytes(v: impl Into<Vec<u8>>) -> Self { Data::Bytes(v.into()) }

    pub fn string(v: impl Into<String>) -> Self { Data::String(v.into()) }

    pub fn list(items: impl IntoIterator<Item = Data>) -> Self { Data::List(items.into_iter().collect()) }

    /// Build a map from key/value pairs, keeping their order. Fails on a repeated key.
    pub fn map<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Data)>) -> Result<Self, DataError> {
        Ok(Data::Map(DataMap::from_pairs(pairs)?))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Data::Empty)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Data::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Data::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Data::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Data::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Data]> {
        match self {
            Data::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&DataMap> {
        match self {
            Data::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Variant name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Data::Empty => "empty",
            Data::Bool(_) => "bool",
            Data::U64(_) => "u64",
            Data::I64(_) => "i64",
            Data::Bytes(_) => "bytes",
            Data::String(_) => "string",
            Data::List(_) => "list",
            Data::Map(_) => "map",
        }
    }
}

impl From<bool> for Data {
    fn from(v: bool) -> Self { Data::Bool(v) }
}

impl From<u64> for Data {
    fn from(v: u64) -> Self { Data::U64(v) }
}

impl From<i64> for Data {
    fn from(v: i64) -> Self { Data::I64(v) }
}

impl From<Vec<u8>> for Data {
    fn from(v: Vec<u8>) -> Self { Data::Bytes(v) }
}

impl From<&str> for Data {
    fn from(v: &str) -> Self { Data::String(v.to_owned()) }
}

impl From<String> for Data {
    fn from(v: String) -> Self { Data::String(v) }
}

/// String-keyed map that keeps insertion order and never holds a key twice.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DataMap(Vec<(String, Data)>);

impl DataMap {
    pub fn new() -> Self { Self(Vec::new()) }

    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Data)>) -> Result<Self, DataError> {
        let mut m = Self::new();
        for (k, v) in pairs {
            m.insert(k, v)?;
        }
        Ok(m)
    }

    /// Append an entry. Existing keys are rejected rather than overwritten.
    pub fn insert(&mut self, key: impl Into<String>, value: Data) -> Result<(), DataError> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(DataError::DuplicateKey(key));
        }
        self.0.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Data> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool { self.get(key).is_some() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Data)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for DataMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DataMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapVisitor;
        impl<'de> Visitor<'de> for MapVisitor {
            type Value = DataMap;
            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map of string keys to data values")
            }
            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = DataMap::new();
                while let Some((k, v)) = access.next_entry::<String, Data>()? {
                    out.insert(k, v).map_err(serde::de::Error::custom)?;
                }
                Ok(out)
            }
        }
        deserializer.deserialize_map(MapVisitor)
    }
}
