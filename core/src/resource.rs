//! Resource specialization points and primary-key matching.
//!
//! A concrete resource supplies only its endpoint path and the name of its
//! primary-key field; everything else in the client is generic.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A record type addressable through a CRUD endpoint.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// URL segment of the collection, relative to the API base URL.
    const RESOURCE_PATH: &'static str;

    /// Name of the serialized field holding the primary key.
    const PRIMARY_KEY_FIELD: &'static str;

    /// Whether this item's primary-key field equals `pk`.
    ///
    /// Items that fail to serialize, or lack the field, never match.
    ///
    /// The default serializes the whole item on every call, and cache scans
    /// call it once per element while holding the channel lock. Resources
    /// with large bodies should override it to compare the key field directly.
    fn has_primary_key(&self, pk: &PrimaryKey) -> bool {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map
                .get(Self::PRIMARY_KEY_FIELD)
                .is_some_and(|v| pk.matches(v)),
            _ => false,
        }
    }
}

/// A primary-key value. Integer and string keys never compare equal.
///
/// Integers that fit in `i64` are always held as `Int`; `Uint` only carries
/// values above `i64::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimaryKey {
    Int(i64),
    Uint(u64),
    Str(String),
}

impl PrimaryKey {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PrimaryKey::Int(i) => value.as_i64() == Some(*i),
            PrimaryKey::Uint(u) => value.as_u64() == Some(*u),
            PrimaryKey::Str(s) => value.as_str() == Some(s.as_str()),
        }
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryKey::Int(i) => write!(f, "{i}"),
            PrimaryKey::Uint(u) => write!(f, "{u}"),
            PrimaryKey::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for PrimaryKey {
    fn from(value: i64) -> Self {
        PrimaryKey::Int(value)
    }
}

impl From<i32> for PrimaryKey {
    fn from(value: i32) -> Self {
        PrimaryKey::Int(value.into())
    }
}

impl From<u32> for PrimaryKey {
    fn from(value: u32) -> Self {
        PrimaryKey::Int(value.into())
    }
}

impl From<u64> for PrimaryKey {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(PrimaryKey::Uint(value), PrimaryKey::Int)
    }
}

impl From<&str> for PrimaryKey {
    fn from(value: &str) -> Self {
        PrimaryKey::Str(value.to_string())
    }
}

impl From<String> for PrimaryKey {
    fn from(value: String) -> Self {
        PrimaryKey::Str(value)
    }
}
