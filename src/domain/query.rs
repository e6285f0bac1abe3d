//! Partial structural matching of documents against query objects

use serde_json::{Map, Value};

/// A schema-free document: string keys mapping to arbitrary JSON values.
pub type Document = Map<String, Value>;

/// Returns true when every key in `query` is satisfied by `document`.
///
/// A nested object in the query recurses into the corresponding document
/// value, which must itself be an object; any other query value requires
/// exact equality, type included. The empty query matches everything.
/// There are no ranges, wildcards, or negations.
pub fn matches(document: &Document, query: &Document) -> bool {
    query.iter().all(|(key, want)| match (document.get(key), want) {
        (Some(Value::Object(have)), Value::Object(nested)) => matches(have, nested),
        (_, Value::Object(_)) => false,
        (Some(have), _) => have == want,
        (None, _) => false,
    })
}
