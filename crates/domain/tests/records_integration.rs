//! Integration tests for record decoding
//!
//! Feeds payloads shaped like real backend responses through the public
//! record types.

use eyecare_domain::{Doctor, EyeCareError, MedicalRecord, Patient, PortalConfig, UserRole};
use serde_json::json;

// ============================================================================
// Directory records
// ============================================================================

/// Decode a mixed doctor list as the directory endpoint returns it
///
/// Scenario: one complete entry, one with a string rating, one bare id
#[test]
fn test_doctor_list_decodes_every_entry() {
    let doctors: Vec<Doctor> = serde_json::from_value(json!([
        {"_id": "d1", "name": "Dr. A", "specialty": "Strabismus", "rating": 4.5},
        {"_id": "d2", "name": "Dr. B", "rating": "3.9", "availability": ["Mon", "Thu"]},
        {"id": "d3"}
    ]))
    .unwrap();

    let ids: Vec<_> = doctors.iter().filter_map(|d| d.id.as_deref()).collect();
    assert_eq!(ids, vec!["d1", "d2", "d3"]);
    assert_eq!(doctors[1].rating, Some(3.9));
    assert_eq!(doctors[1].extra["availability"], json!(["Mon", "Thu"]));
    assert_eq!(doctors[2].rating_or_zero(), 0.0);
}

/// Decode a patient as stored by older backend versions
///
/// Scenario: visit details live under `vitals`, medications are bare strings
#[test]
fn test_legacy_patient_shape() {
    let patient: Patient = serde_json::from_value(json!({
        "_id": "p1",
        "name": "Jordan",
        "age": 9,
        "gender": "Female",
        "medicalHistory": ["Accommodative esotropia"],
        "medications": ["Atropine 1%"],
        "vitals": {
            "lastVisit": "2024-01-12",
            "upcomingAppointment": "2024-07-12",
            "bloodType": "B+"
        }
    }))
    .unwrap();

    assert_eq!(patient.age, 9);
    assert_eq!(patient.last_visit.as_deref(), Some("2024-01-12"));
    assert_eq!(patient.upcoming_appointment.as_deref(), Some("2024-07-12"));
    assert_eq!(patient.blood_type.as_deref(), Some("B+"));
    assert_eq!(patient.medications[0].name, "Atropine 1%");
    assert_eq!(patient.medications[0].dosage, "As prescribed");
    assert_eq!(patient.status, "Unknown");
}

/// Records requested for a patient are attributed to that patient
#[test]
fn test_report_attribution() {
    let records: Vec<MedicalRecord> = serde_json::from_value(json!([
        {"_id": "r1", "diagnosis": "Convergence insufficiency", "date": "2024-02-02T08:00:00.000Z"},
        {"_id": "r2", "patientId": "p2", "patientName": "Other"}
    ]))
    .unwrap();

    let records: Vec<_> = records.into_iter().map(|r| r.for_patient("p1", "Jordan")).collect();

    assert_eq!(records[0].patient_id, "p1");
    assert_eq!(records[0].doctor_name, "Unknown Doctor");
    assert_eq!(records[0].created_at, "2024-02-02T08:00:00.000Z");
    assert_eq!(records[1].patient_id, "p2");
    assert_eq!(records[1].diagnosis, "No diagnosis");
}

// ============================================================================
// Errors and configuration
// ============================================================================

#[test]
fn test_error_round_trips_through_json() {
    let err = EyeCareError::Server("502 Bad Gateway".to_string());
    let json = serde_json::to_string(&err).unwrap();
    let back: EyeCareError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);
    assert!(back.is_transient());
}

#[test]
fn test_config_from_json_document() {
    let config: PortalConfig = serde_json::from_value(json!({
        "api": {"base_url": "http://localhost:5000", "timeout_ms": 5000},
        "storage": {"path": "/tmp/eyecare.db"},
        "logging": {"level": "debug", "json": true}
    }))
    .unwrap();

    assert_eq!(config.api.base_url, "http://localhost:5000");
    assert_eq!(config.api.timeout_ms, 5000);
    assert!(config.api.user_agent.starts_with("eyecare-portal/"));
    assert_eq!(config.storage.path.as_deref(), Some("/tmp/eyecare.db"));
    assert!(config.logging.json);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(UserRole::default(), UserRole::Unknown);
}
