//! Query string <-> JSON object conversion.
//!
//! Decoding follows `application/x-www-form-urlencoded`:
//! - a key seen more than once collects its values into an array, in order
//! - a key shaped `parent[child]` is moved under a nested `parent` object
//!
//! Encoding is the inverse: arrays emit one pair per item and nested
//! objects expand into `parent[child]` keys.

use serde_json::{Map, Value};
use tracing::trace;
use url::form_urlencoded;

use crate::error::{ParamsError, Result};

/// Parse a query string (with or without a leading `?`) into a JSON object.
///
/// All values are strings, or arrays of strings for repeated keys.
///
/// ```
/// use jsonkit_params::parse_query_string;
/// use serde_json::json;
///
/// let params = parse_query_string("tags=red&tags=blue&user[name]=John");
/// assert_eq!(
///     serde_json::Value::Object(params),
///     json!({"tags": ["red", "blue"], "user": {"name": "John"}})
/// );
/// ```
pub fn parse_query_string(query: &str) -> Map<String, Value> {
    let query = query.strip_prefix('?').unwrap_or(query);
    if query.is_empty() {
        return Map::new();
    }

    let mut params = Map::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());
        match params.get_mut(&*key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                params.insert(key.into_owned(), value);
            }
        }
    }

    let mut flat = Map::new();
    let mut nested = Map::new();
    for (key, value) in params {
        match split_bracket_key(&key) {
            Some((parent, child)) => {
                trace!(parent, child, "nesting bracketed query key");
                let slot = nested
                    .entry(parent.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(children) = slot {
                    children.insert(child.to_string(), value);
                }
            }
            None => {
                flat.insert(key, value);
            }
        }
    }

    // Nested objects replace a flat key of the same name.
    for (parent, children) in nested {
        flat.insert(parent, children);
    }
    flat
}

/// Split `parent[child]` into its two halves.
///
/// The parent must be non-empty and contain no `[`; the child must
/// contain no `]` and the key must end right after it.
fn split_bracket_key(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    let parent = &key[..open];
    let child = key[open + 1..].strip_suffix(']')?;
    if parent.is_empty() || child.contains(']') {
        return None;
    }
    Some((parent, child))
}

/// Encode a JSON object as a query string.
///
/// ```
/// use jsonkit_params::object_to_query_string;
/// use serde_json::json;
///
/// let object = json!({"q": "rust lang", "page": 2});
/// let query = object_to_query_string(object.as_object().unwrap());
/// assert_eq!(query, "q=rust+lang&page=2");
/// ```
pub fn object_to_query_string(object: &Map<String, Value>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in object {
        append_param(&mut serializer, key, value);
    }
    serializer.finish()
}

fn append_param(serializer: &mut form_urlencoded::Serializer<'_, String>, key: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                serializer.append_pair(key, &pair_value(item));
            }
        }
        Value::Object(fields) => {
            for (sub_key, sub_value) in fields {
                append_param(serializer, &format!("{key}[{sub_key}]"), sub_value);
            }
        }
        scalar => {
            serializer.append_pair(key, &pair_value(scalar));
        }
    }
}

/// Strings are emitted raw; everything else as compact JSON text.
fn pair_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Encode any JSON value, rejecting non-objects.
pub fn encode_value(value: &Value) -> Result<String> {
    match value {
        Value::Object(object) => Ok(object_to_query_string(object)),
        other => Err(ParamsError::NotAnObject {
            found: value_kind(other),
        }),
    }
}

/// Returns `true` if every leaf of `value` can be written as a pair value.
///
/// Null is not serializable; scalars are; containers are when all their
/// members are.
pub fn is_serializable_for_url(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(_) | Value::Number(_) | Value::String(_) => true,
        Value::Array(items) => items.iter().all(is_serializable_for_url),
        Value::Object(fields) => fields.values().all(is_serializable_for_url),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
