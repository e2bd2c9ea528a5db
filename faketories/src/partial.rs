//! Partial overrides and the shallow merge applied to generated defaults.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{FaketoryError, Result};

/// Sparse set of fields laid over generated defaults.
pub type Partial = Map<String, Value>;

/// Anything a collection can hold.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Entity for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// Turn a JSON value into a [`Partial`]. Only objects are accepted.
pub fn partial(value: Value) -> Result<Partial> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(FaketoryError::InvalidPartial(other.to_string())),
    }
}

/// Overlay `partial` onto `defaults`, top-level keys only; partial keys win.
///
/// The result is deserialized back into `T`, so a partial with a field of
/// the wrong type is rejected.
pub fn merge_partial<T: Entity>(collection: &str, defaults: T, partial: &Partial) -> Result<T> {
    if partial.is_empty() {
        return Ok(defaults);
    }

    let mut fields = match serde_json::to_value(defaults)? {
        Value::Object(map) => map,
        other => {
            return Err(FaketoryError::validation(
                collection,
                format!("entities must serialize to objects, got {other}"),
            ));
        }
    };

    for (key, value) in partial {
        fields.insert(key.clone(), value.clone());
    }

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| FaketoryError::validation(collection, e.to_string()))
}
