//! Clinical records: appointments, observations, encounters and medical records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub fhir_id: Option<String>,
    pub patient_id: i64,
    pub appointment_datetime: Option<String>,
    pub status: Option<String>,
    pub practitioner: Option<String>,
    pub location: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AppointmentInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practitioner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub id: i64,
    pub fhir_id: Option<String>,
    pub patient_id: i64,
    pub code: Option<String>,
    pub value: Option<String>,
    pub value_type: Option<String>,
    pub unit: Option<String>,
    pub effective_datetime: Option<String>,
    pub interpretation: Option<String>,
    pub status: Option<String>,
    pub issued: Option<String>,
    pub performer: Option<String>,
    pub notes: Option<String>,
}

impl Observation {
    /// Value with its unit, e.g. "120 mmHg"
    pub fn value_display(&self) -> String {
        match (&self.value, &self.unit) {
            (Some(v), Some(u)) if !u.is_empty() => format!("{} {}", v, u),
            (Some(v), _) => v.clone(),
            (None, _) => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ObservationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    pub id: i64,
    pub fhir_id: Option<String>,
    pub patient_id: i64,
    pub encounter_class: Option<String>,
    #[serde(rename = "type")]
    pub encounter_type: Option<String>,
    pub status: Option<String>,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub location: Option<String>,
    pub provider: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl Encounter {
    /// An encounter without an end time is still open
    pub fn is_open(&self) -> bool {
        self.period_end.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EncounterInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_class: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub encounter_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub patient_id: i64,
    pub clinician_id: Option<i64>,
    pub record_date: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MedicalRecordInput {
    pub patient_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinician_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_value_display() {
        let json = r#"{"id": 1, "patient_id": 2, "code": "8480-6", "value": "120", "unit": "mmHg", "status": "final"}"#;
        let obs: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.value_display(), "120 mmHg");
    }

    #[test]
    fn test_encounter_type_field() {
        let json = r#"{"id": 4, "patient_id": 2, "type": "follow-up", "period_start": "2024-06-01T10:00:00", "period_end": null}"#;
        let enc: Encounter = serde_json::from_str(json).unwrap();
        assert_eq!(enc.encounter_type.as_deref(), Some("follow-up"));
        assert!(enc.is_open());

        let input = EncounterInput {
            encounter_type: Some("inpatient".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            serde_json::json!({"type": "inpatient"})
        );
    }
}
