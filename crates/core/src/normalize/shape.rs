//! Envelope shape detection

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Which kind of record list a payload is expected to carry
///
/// The kind supplies the domain key looked up inside `data` and at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Doctors,
    Patients,
    Records,
    /// No domain key; only the generic shapes are recognised
    Any,
}

impl RecordKind {
    pub fn domain_key(self) -> Option<&'static str> {
        match self {
            Self::Doctors => Some("doctors"),
            Self::Patients => Some("patients"),
            Self::Records => Some("records"),
            Self::Any => None,
        }
    }
}

/// Generic key looked up inside the `data` object after the domain key.
const GENERIC_KEY: &str = "data";

/// Where the record list was found in a payload
///
/// Variants are listed in detection order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeShape<'a> {
    /// `[ ... ]`
    RootList(&'a [Value]),
    /// `{ "data": [ ... ] }` with no `success` key
    DataList(&'a [Value]),
    /// `{ "success": flag, "data": [ ... ] }`
    Flagged { success: bool, items: &'a [Value] },
    /// `{ "data": { "<key>": [ ... ] } }` for the domain key or `data`
    Keyed { key: &'a str, items: &'a [Value] },
    /// `{ "data": { ... } }` whose first array-valued member is `key`
    FirstNested { key: &'a str, items: &'a [Value] },
    /// `{ "<domain key>": [ ... ] }`
    RootKeyed { key: &'a str, items: &'a [Value] },
    /// No record list found
    Unrecognized,
}

impl<'a> EnvelopeShape<'a> {
    /// The record list this shape selects; empty for an unsuccessful
    /// flagged envelope and for unrecognised payloads.
    pub fn items(&self) -> &'a [Value] {
        match *self {
            Self::RootList(items) | Self::DataList(items) => items,
            Self::Flagged { success, items } => {
                if success {
                    items
                } else {
                    &[]
                }
            }
            Self::Keyed { items, .. }
            | Self::FirstNested { items, .. }
            | Self::RootKeyed { items, .. } => items,
            Self::Unrecognized => &[],
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::RootList(_) => "root_list",
            Self::DataList(_) => "data_list",
            Self::Flagged { .. } => "flagged",
            Self::Keyed { .. } => "keyed",
            Self::FirstNested { .. } => "first_nested",
            Self::RootKeyed { .. } => "root_keyed",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Classify `payload` into the first matching envelope shape.
pub fn detect_shape(payload: &Value, kind: RecordKind) -> EnvelopeShape<'_> {
    let root = match payload {
        Value::Array(items) => return EnvelopeShape::RootList(items),
        Value::Object(root) => root,
        _ => return EnvelopeShape::Unrecognized,
    };

    match root.get("data") {
        Some(Value::Array(items)) => {
            return match root.get("success") {
                None => EnvelopeShape::DataList(items),
                Some(flag) => EnvelopeShape::Flagged { success: is_truthy(flag), items },
            };
        }
        Some(Value::Object(data)) => {
            for key in kind.domain_key().into_iter().chain([GENERIC_KEY]) {
                if let Some(Value::Array(items)) = data.get(key) {
                    return EnvelopeShape::Keyed { key, items };
                }
            }
            let first_array = data
                .iter()
                .find_map(|(key, value)| value.as_array().map(|items| (key.as_str(), items)));
            if let Some((key, items)) = first_array {
                return EnvelopeShape::FirstNested { key, items };
            }
        }
        _ => {}
    }

    if let Some(key) = kind.domain_key() {
        if let Some(Value::Array(items)) = root.get(key) {
            return EnvelopeShape::RootKeyed { key, items };
        }
    }

    EnvelopeShape::Unrecognized
}

/// Extract the record list from `payload`, in source order.
///
/// Never fails: a payload with no recognisable list yields an empty vector.
pub fn normalize_list(payload: &Value, kind: RecordKind) -> Vec<Value> {
    let shape = detect_shape(payload, kind);
    log_shape(&shape, kind);
    shape.items().to_vec()
}

/// Extract the record list from `payload` and decode each item as `T`.
///
/// Items that do not decode are skipped so one malformed entry does not hide
/// the rest of the list.
pub fn normalize_records<T: DeserializeOwned>(payload: &Value, kind: RecordKind) -> Vec<T> {
    let shape = detect_shape(payload, kind);
    log_shape(&shape, kind);
    shape
        .items()
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(?kind, index, error = %err, "skipping record that failed to decode");
                None
            }
        })
        .collect()
}

/// Loose truthiness of a JSON flag.
///
/// `false`, `0`, `""` and `null` are falsy; every other value, including
/// empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn log_shape(shape: &EnvelopeShape<'_>, kind: RecordKind) {
    match shape {
        EnvelopeShape::Unrecognized => {
            warn!(?kind, "response did not match a known shape; treating as empty list");
        }
        EnvelopeShape::Flagged { success: false, .. } => {
            debug!(?kind, "response flagged unsuccessful; treating as empty list");
        }
        _ => debug!(?kind, shape = shape.name(), count = shape.items().len(), "normalized response"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn normalize(payload: Value) -> Vec<Value> {
        normalize_list(&payload, RecordKind::Doctors)
    }

    #[test]
    fn root_array_is_returned_as_is() {
        assert_eq!(normalize(json!([4, 5])), vec![json!(4), json!(5)]);
        assert!(matches!(
            detect_shape(&json!([]), RecordKind::Any),
            EnvelopeShape::RootList(items) if items.is_empty()
        ));
    }

    #[test]
    fn data_array_without_flag() {
        assert_eq!(normalize(json!({"data": [1, 2, 3]})), vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn success_flag_gates_data_array() {
        let items = json!([{"_id": "d1"}]);
        assert_eq!(normalize(json!({"success": true, "data": items})), vec![json!({"_id": "d1"})]);
        assert!(normalize(json!({"success": false, "data": items})).is_empty());
        assert!(normalize(json!({"success": 0, "data": items})).is_empty());
        assert_eq!(normalize(json!({"success": "yes", "data": items})).len(), 1);
    }

    #[test]
    fn domain_key_inside_data() {
        let payload = json!({"data": {"total": 2, "doctors": [{"_id": "d1"}, {"_id": "d2"}]}});
        assert_eq!(normalize(payload.clone()).len(), 2);
        assert!(matches!(
            detect_shape(&payload, RecordKind::Doctors),
            EnvelopeShape::Keyed { key: "doctors", .. }
        ));
    }

    #[test]
    fn domain_key_wins_over_generic_key() {
        let payload = json!({"data": {"data": [1], "doctors": [2, 3]}});
        assert_eq!(normalize(payload), vec![json!(2), json!(3)]);
    }

    #[test]
    fn generic_key_inside_data() {
        let payload = json!({"data": {"data": [{"_id": "p1"}]}});
        assert_eq!(normalize_list(&payload, RecordKind::Patients).len(), 1);
    }

    #[test]
    fn first_nested_array_in_iteration_order() {
        let payload = json!({"data": {"page": 1, "items": ["a"], "more": ["b", "c"]}});
        assert_eq!(normalize(payload.clone()), vec![json!("a")]);
        assert!(matches!(
            detect_shape(&payload, RecordKind::Doctors),
            EnvelopeShape::FirstNested { key: "items", .. }
        ));
    }

    #[test]
    fn root_level_domain_key() {
        let payload = json!({"doctors": [{"_id": "d1"}]});
        assert_eq!(normalize(payload.clone()).len(), 1);
        assert!(normalize_list(&payload, RecordKind::Patients).is_empty());
    }

    #[test]
    fn unrecognized_payloads_are_empty() {
        for payload in [
            json!({"foo": "bar"}),
            json!(null),
            json!("not a list"),
            json!(17),
            json!({"data": "nope"}),
            json!({"data": {"count": 0}}),
            json!({}),
        ] {
            assert!(normalize(payload.clone()).is_empty(), "payload {payload} should be empty");
        }
    }

    #[test]
    fn source_order_is_preserved() {
        let payload = json!({"data": [{"n": 3}, {"n": 1}, {"n": 2}]});
        let order: Vec<_> = normalize(payload).iter().map(|v| v["n"].as_i64()).collect();
        assert_eq!(order, vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn normalizing_a_normalized_list_is_identity() {
        for payload in [
            json!({"data": [1, 2]}),
            json!({"data": {"doctors": [{"_id": "x"}]}}),
            json!({"success": false, "data": [1]}),
            json!({"foo": "bar"}),
        ] {
            let once = normalize(payload);
            let twice = normalize(Value::Array(once.clone()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn payload_is_not_modified() {
        let payload = json!({"success": true, "data": [1, 2]});
        let before = payload.clone();
        let _ = normalize_list(&payload, RecordKind::Any);
        assert_eq!(payload, before);
    }

    #[test]
    fn records_skip_undecodable_items() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Item {
            id: u32,
        }

        let payload = json!({"data": [{"id": 1}, "junk", {"id": 2}, {"id": "three"}]});
        let items: Vec<Item> = normalize_records(&payload, RecordKind::Any);
        assert_eq!(items, vec![Item { id: 1 }, Item { id: 2 }]);
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!(-0.5)));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
    }
}
