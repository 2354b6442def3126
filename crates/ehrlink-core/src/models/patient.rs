use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub user_id: Option<i64>,
    pub fhir_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_record_number: Option<String>,
    pub insurance_id: Option<String>,
    pub insurance_provider: Option<String>,
    pub created_at: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// "Last, First" for sorted listings
    pub fn sort_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatientInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_record_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_provider: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_patient() {
        let json = r#"{"id": 7, "user_id": 3, "fhir_id": "0b6f2c1e-93a4-4a8e-bf0c-1f2f0d6c9a10", "first_name": "Ada", "last_name": "Obi", "date_of_birth": "1984-02-11", "gender": "female", "email": "ada@example.com", "created_at": "2024-05-01T09:30:00"}"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.full_name(), "Ada Obi");
        assert_eq!(patient.sort_name(), "Obi, Ada");
        assert_eq!(patient.phone, None);
    }
}
