use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{
    Appointment, AppointmentInput, Encounter, EncounterInput, MedicalRecord, MedicalRecordInput,
    Observation, ObservationInput,
};

impl ApiClient {
    // ===== Appointments =====

    pub async fn list_appointments(&self, patient_id: Option<i64>) -> Result<Vec<Appointment>, ApiError> {
        self.fetch(ApiRequest::get("/clinical/appointments").query_opt("patient_id", patient_id))
            .await
    }

    pub async fn create_appointment(&self, input: &AppointmentInput) -> Result<Appointment, ApiError> {
        self.post_json("/clinical/appointments", input).await
    }

    pub async fn update_appointment(
        &self,
        id: i64,
        input: &AppointmentInput,
    ) -> Result<Appointment, ApiError> {
        self.put_json(&format!("/clinical/appointments/{}", id), input)
            .await
    }

    pub async fn delete_appointment(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/clinical/appointments/{}", id)).await
    }

    // ===== Observations =====

    pub async fn list_observations(&self, patient_id: Option<i64>) -> Result<Vec<Observation>, ApiError> {
        self.fetch(ApiRequest::get("/clinical/observations").query_opt("patient_id", patient_id))
            .await
    }

    /// Accepts either the numeric id or the FHIR id
    pub async fn get_observation(&self, id: &str) -> Result<Observation, ApiError> {
        self.get_json(&format!("/clinical/observations/{}", id)).await
    }

    pub async fn create_observation(&self, input: &ObservationInput) -> Result<Observation, ApiError> {
        self.post_json("/clinical/observations", input).await
    }

    pub async fn update_observation(
        &self,
        id: &str,
        input: &ObservationInput,
    ) -> Result<Observation, ApiError> {
        self.put_json(&format!("/clinical/observations/{}", id), input)
            .await
    }

    pub async fn delete_observation(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/clinical/observations/{}", id)).await
    }

    // ===== Encounters =====

    pub async fn list_encounters(&self, patient_id: Option<i64>) -> Result<Vec<Encounter>, ApiError> {
        self.fetch(ApiRequest::get("/clinical/encounters").query_opt("patient_id", patient_id))
            .await
    }

    pub async fn create_encounter(&self, input: &EncounterInput) -> Result<Encounter, ApiError> {
        self.post_json("/clinical/encounters", input).await
    }

    pub async fn update_encounter(&self, id: i64, input: &EncounterInput) -> Result<Encounter, ApiError> {
        self.put_json(&format!("/clinical/encounters/{}", id), input)
            .await
    }

    pub async fn delete_encounter(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/clinical/encounters/{}", id)).await
    }

    // ===== Medical records =====

    pub async fn patient_records(&self, patient_id: i64) -> Result<Vec<MedicalRecord>, ApiError> {
        self.get_json(&format!("/clinical/records/{}", patient_id))
            .await
    }

    pub async fn create_record(&self, input: &MedicalRecordInput) -> Result<MedicalRecord, ApiError> {
        self.post_json("/clinical/records", input).await
    }
}
