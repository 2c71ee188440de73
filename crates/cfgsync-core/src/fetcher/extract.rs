//! Pull the result collection out of a response.

use serde_json::Value;

/// Rows under `key` in a response.
///
/// The key is looked up inside the `return` object when the response has
/// one, else at the top level. An array is a page of rows and any other
/// non-null value a single row. `None` means the key is absent (or null),
/// which callers treat as an empty page.
pub fn extract_collection(response: Value, key: &str) -> Option<Vec<Value>> {
    let mut response = response;
    let inner = response
        .get_mut("return")
        .filter(|v| v.is_object())
        .map(Value::take);
    let mut envelope = inner.unwrap_or(response);
    match envelope.as_object_mut()?.remove(key)? {
        Value::Null => None,
        Value::Array(rows) => Some(rows),
        row => Some(vec![row]),
    }
}
