//! Single-record and write-acknowledgement envelopes

use eyecare_domain::{EyeCareError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::shape::is_truthy;

const SUCCESS_KEY: &str = "success";
const DATA_KEY: &str = "data";

/// Locate the one record a payload carries.
///
/// Recognises `{success, data: {...}}`, `{data: {...}}` and the bare record
/// object. A payload flagged unsuccessful, or flagged without a `data`
/// object, carries no record.
pub fn single_record(payload: &Value) -> Option<&Value> {
    let envelope = payload.as_object()?;
    if envelope.get(SUCCESS_KEY).is_some_and(|flag| !is_truthy(flag)) {
        return None;
    }
    match envelope.get(DATA_KEY) {
        Some(data) => Some(data).filter(|data| data.is_object()),
        None if envelope.contains_key(SUCCESS_KEY) => None,
        None => Some(payload),
    }
}

/// Decode the record in `payload` as `T`.
///
/// # Errors
///
/// [`EyeCareError::NotFound`] with the backend's message (or `what`) when
/// no record is present; [`EyeCareError::Decode`] when it does not decode.
pub fn decode_record<T: DeserializeOwned>(payload: &Value, what: &str) -> Result<T> {
    let record = single_record(payload)
        .ok_or_else(|| EyeCareError::NotFound(message(payload).unwrap_or_else(|| what.into())))?;
    Ok(T::deserialize(record)?)
}

/// Check that a write was accepted, returning its payload.
///
/// Writes answer with a `success` flag; an explicit falsy flag becomes
/// [`EyeCareError::Client`] carrying the backend's message, or `fallback`.
/// Payloads without the flag are taken as accepted.
pub fn accepted(payload: Value, fallback: &str) -> Result<Value> {
    match payload.get(SUCCESS_KEY) {
        Some(flag) if !is_truthy(flag) => {
            Err(EyeCareError::Client(message(&payload).unwrap_or_else(|| fallback.into())))
        }
        _ => Ok(payload),
    }
}

fn message(payload: &Value) -> Option<String> {
    payload.get("message").and_then(Value::as_str).filter(|m| !m.is_empty()).map(str::to_owned)
}
