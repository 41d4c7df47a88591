// translate/mod.rs - Legacy ⇄ canonical payload mapping
//
// The browser still speaks PascalCase for contacts and tiles; the backend
// speaks camelCase. Each resource defines a pair of serde structs and the
// From impls between them; this module applies them to whatever envelope
// the payload arrives in.

pub mod contacts;
pub mod tiles;
pub mod user;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The payload layouts seen from the backend and the browser
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `[item, ...]`
    Bare(Vec<Value>),
    /// `{ "<key>": [item, ...], ...other fields kept as-is }`
    Keyed { key: String, items: Vec<Value>, rest: Map<String, Value> },
    /// `{ ...single item... }`
    Single(Map<String, Value>),
    /// Scalars and null, never reshaped
    Other(Value),
}

impl Envelope {
    pub fn classify(value: Value, list_keys: &[&str]) -> Self {
        match value {
            Value::Array(items) => Envelope::Bare(items),
            Value::Object(mut map) => {
                let key = list_keys
                    .iter()
                    .find(|k| map.get(**k).is_some_and(Value::is_array))
                    .map(|k| k.to_string());

                match key {
                    Some(key) => match map.remove(&key) {
                        Some(Value::Array(items)) => Envelope::Keyed { key, items, rest: map },
                        _ => Envelope::Single(map),
                    },
                    None => Envelope::Single(map),
                }
            }
            other => Envelope::Other(other),
        }
    }

    /// Apply `f` to every item, rebuilding the same envelope around the results.
    pub fn try_map<E>(self, mut f: impl FnMut(Value) -> Result<Value, E>) -> Result<Value, E> {
        match self {
            Envelope::Bare(items) => Ok(Value::Array(
                items.into_iter().map(&mut f).collect::<Result<_, _>>()?,
            )),
            Envelope::Keyed { key, items, mut rest } => {
                let items: Vec<Value> = items.into_iter().map(&mut f).collect::<Result<_, _>>()?;
                rest.insert(key, Value::Array(items));
                Ok(Value::Object(rest))
            }
            Envelope::Single(map) => f(Value::Object(map)),
            Envelope::Other(value) => Ok(value),
        }
    }
}

/// Convert one item from shape `A` to shape `B`. Unknown fields of `A` are
/// dropped; non-object items are kept as-is.
pub fn convert<A, B>(item: Value) -> Result<Value, serde_json::Error>
where
    A: DeserializeOwned,
    B: Serialize + From<A>,
{
    if !item.is_object() {
        return Ok(item);
    }
    let from: A = serde_json::from_value(item)?;
    serde_json::to_value(B::from(from))
}

/// Convert every item of a payload, whatever its envelope. A single object
/// carrying none of `fields` (an acknowledgement, an error, a wrapper) is not
/// an item of shape `A` and passes through untouched.
pub fn convert_payload<A, B>(value: Value, list_keys: &[&str], fields: &[&str]) -> Result<Value, serde_json::Error>
where
    A: DeserializeOwned,
    B: Serialize + From<A>,
{
    match Envelope::classify(value, list_keys) {
        Envelope::Single(map) if !fields.iter().any(|f| map.contains_key(*f)) => Ok(Value::Object(map)),
        envelope => envelope.try_map(convert::<A, B>),
    }
}

/// Identifiers arrive as strings or numbers; both become strings.
pub fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

/// Lenient text field: numbers and booleans are rendered, anything else is absent.
pub fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Lenient integer field: numeric strings are parsed, anything else is absent.
pub fn de_opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
