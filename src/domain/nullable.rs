//! Deserializers that keep an explicit `null` apart from a missing key.
//!
//! Both are meant for fields marked `#[serde(default)]`: a missing key never
//! reaches them and stays `None`, so only a key that is present, `null`
//! included, produces `Some`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `null` becomes `Some(None)`, any other value `Some(Some(value))`.
#[allow(clippy::option_option)]
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// `null` becomes `Some(Value::Null)`.
pub fn deserialize_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
