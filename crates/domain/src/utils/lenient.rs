//! Lenient field decoders for backend records
//!
//! The backend omits fields, sends `null`, or sends a scalar where a list is
//! expected. These helpers are used with `#[serde(deserialize_with = ...)]`
//! and never fail: anything unusable decodes to the empty value of the field
//! type so the record type can apply its own placeholder.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::constants::{DEFAULT_DOSAGE, DEFAULT_FREQUENCY, UNKNOWN_MEDICATION};
use crate::types::Medication;

/// Non-empty string, or a number rendered as text; anything else is `None`.
pub fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(&Value::deserialize(deserializer)?))
}

/// Array of strings; non-string items are dropped, non-arrays become empty.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => {
            items.into_iter().filter_map(|item| item.as_str().map(str::to_owned)).collect()
        }
        _ => Vec::new(),
    })
}

/// Non-negative whole number; fractions are truncated, anything else is 0.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => match n.as_u64() {
            Some(whole) => u32::try_from(whole).unwrap_or(u32::MAX),
            None => n.as_f64().filter(|f| *f > 0.0).map_or(0, |f| f.min(f64::from(u32::MAX)) as u32),
        },
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Finite number, or a string holding one.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|f: &f64| f.is_finite()))
}

/// Any JSON value except `null`.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(other),
    })
}

/// Medication list; see [`medication`] for how items are read.
pub fn medications<'de, D>(deserializer: D) -> Result<Vec<Medication>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().map(medication).collect(),
        _ => Vec::new(),
    })
}

/// Read one medication entry.
///
/// Objects carrying name, dosage and frequency are kept as they are. A bare
/// string is taken as the medication name with standing instructions; any
/// other entry becomes an unknown medication.
pub fn medication(value: &Value) -> Medication {
    if let Value::Object(fields) = value {
        let field = |key: &str| fields.get(key).and_then(text);
        if let (Some(name), Some(dosage), Some(frequency)) =
            (field("name"), field("dosage"), field("frequency"))
        {
            return Medication { name, dosage, frequency, duration: field("duration") };
        }
    }

    let name = match value {
        Value::String(s) => s.clone(),
        _ => UNKNOWN_MEDICATION.to_string(),
    };
    Medication {
        name,
        dosage: DEFAULT_DOSAGE.to_string(),
        frequency: DEFAULT_FREQUENCY.to_string(),
        duration: None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
