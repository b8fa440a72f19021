//! Shared test utilities for the modguard workspace.
//!
//! Lives in its own crate because `xtask` needs `normalize_nondeterministic` at runtime.

use serde_json::Value;

const TIMESTAMP: &str = "__TIMESTAMP__";
const VERSION: &str = "__VERSION__";

/// Normalize non-deterministic report fields for golden-file comparison.
///
/// `tool.version` is replaced only on a root report object (`schema`, `tool`, `verdict`,
/// `findings` and `data` all present). `started_at`/`finished_at` are replaced at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_report = ["schema", "tool", "verdict", "findings", "data"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_report
            && let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
            && tool.contains_key("version")
        {
            tool.insert("version".to_string(), Value::String(VERSION.to_string()));
        }
    }
    normalize_timestamps(&mut value);
    value
}

fn normalize_timestamps(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String(TIMESTAMP.to_string()));
                }
            }
            for v in map.values_mut() {
                normalize_timestamps(v);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                normalize_timestamps(v);
            }
        }
        _ => {}
    }
}
