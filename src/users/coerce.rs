//! Lenient deserializers for free-form user fields. Scalars of any JSON type
//! are stored as text, and a single value given for a list field becomes a
//! one-element list.

use serde::{de::Error, Deserialize, Deserializer};
use serde_json::Value;

fn scalar_to_string(value: Value) -> Result<String, &'static str> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err("expected a text, number or boolean value"),
    }
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(v) => scalar_to_string(v).map(Some).map_err(D::Error::custom),
    }
}

pub fn opt_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(scalar_to_string)
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
            .map_err(D::Error::custom),
        Some(v) => scalar_to_string(v)
            .map(|s| Some(vec![s]))
            .map_err(D::Error::custom),
    }
}
