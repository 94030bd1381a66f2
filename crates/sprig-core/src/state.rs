//! Component state merging.

use serde_json::Value;

fn is_composite(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Merges `partial` into `state`.
///
/// A missing or primitive `state` is replaced outright. Otherwise every key
/// of `partial` overwrites a missing/primitive slot and recurses into a
/// composite one, so composite sub-values are never replaced wholesale.
/// Arrays are addressed by index; a primitive partial aimed at a composite
/// slot has no keys and leaves it untouched.
pub fn merge_state(state: &mut Value, partial: Value) {
    if !is_composite(state) {
        *state = partial;
        return;
    }
    merge_into(state, partial);
}

fn merge_into(target: &mut Value, partial: Value) {
    let entries: Vec<(String, Value)> = match partial {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        _ => return,
    };
    for (key, value) in entries {
        let Some(slot) = slot_mut(target, &key) else {
            continue;
        };
        if is_composite(slot) {
            merge_into(slot, value);
        } else {
            *slot = value;
        }
    }
}

/// Slot for `key`, created as `null` when absent. Array targets only accept
/// index keys and grow with `null` padding.
fn slot_mut<'a>(target: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match target {
        Value::Object(map) => Some(map.entry(key.to_owned()).or_insert(Value::Null)),
        Value::Array(items) => {
            let index: usize = key.parse().ok()?;
            if index >= items.len() {
                items.resize(index + 1, Value::Null);
            }
            items.get_mut(index)
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
