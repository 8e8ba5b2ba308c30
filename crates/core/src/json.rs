use serde_json::Value;

/// Recursively remove all object fields whose value is `Value::Null`.
///
/// Array elements that are null are left alone (removing them would change
/// indices); objects nested inside arrays are still pruned.
pub fn prune_null_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for v in map.values_mut() {
                prune_null_fields(v);
            }
            map.retain(|_, v| !matches!(v, Value::Null));
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                prune_null_fields(v);
            }
        }
        _ => {}
    }
}

/// Return a cloned JSON value with all null-valued object fields removed.
pub fn without_null_fields(value: &Value) -> Value {
    let mut cloned = value.clone();
    prune_null_fields(&mut cloned);
    cloned
}
