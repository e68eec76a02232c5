//! Recursive merge of option documents
//!
//! Mappings merge key by key; every other value (numbers, strings, arrays)
//! replaces the destination wholesale. `null` in the source keeps whatever the
//! destination already holds.

use serde_json::{Map, Value};

/// Merge `source` into `destination` in place
pub fn deep_merge(destination: &mut Value, source: &Value) {
    match (destination, source) {
        (Value::Object(dest), Value::Object(src)) => {
            for (key, value) in src {
                match value {
                    Value::Null => {}
                    Value::Object(_) => {
                        let slot = dest
                            .entry(key.clone())
                            .or_insert_with(|| Value::Object(Map::new()));
                        if !slot.is_object() {
                            *slot = Value::Object(Map::new());
                        }
                        deep_merge(slot, value);
                    }
                    _ => {
                        dest.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (dest, src) => *dest = src.clone(),
    }
}

/// Combine two overrides into one, `later` winning on shared key paths
pub fn combine(earlier: &Value, later: &Value) -> Value {
    let mut combined = earlier.clone();
    deep_merge(&mut combined, later);
    combined
}
