use serde_json::json;

use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{CounselingResponse, Prescription, PrescriptionInput, TreatmentPlan, TreatmentPlanInput};

impl ApiClient {
    // ===== Prescriptions (addressed by FHIR id) =====

    pub async fn list_prescriptions(&self, patient_id: Option<i64>) -> Result<Vec<Prescription>, ApiError> {
        self.fetch(ApiRequest::get("/medications/prescriptions").query_opt("patient_id", patient_id))
            .await
    }

    pub async fn get_prescription(&self, fhir_id: &str) -> Result<Prescription, ApiError> {
        self.get_json(&format!("/medications/prescriptions/{}", fhir_id))
            .await
    }

    pub async fn create_prescription(&self, input: &PrescriptionInput) -> Result<Prescription, ApiError> {
        self.post_json("/medications/prescriptions", input).await
    }

    pub async fn update_prescription(
        &self,
        fhir_id: &str,
        input: &PrescriptionInput,
    ) -> Result<Prescription, ApiError> {
        self.put_json(&format!("/medications/prescriptions/{}", fhir_id), input)
            .await
    }

    pub async fn delete_prescription(&self, fhir_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/medications/prescriptions/{}", fhir_id))
            .await
    }

    // ===== Treatment plans =====

    pub async fn list_treatment_plans(&self, patient_id: Option<i64>) -> Result<Vec<TreatmentPlan>, ApiError> {
        self.fetch(ApiRequest::get("/medications/treatment-plans").query_opt("patient_id", patient_id))
            .await
    }

    pub async fn get_treatment_plan(&self, id: i64) -> Result<TreatmentPlan, ApiError> {
        self.get_json(&format!("/medications/treatment-plans/{}", id))
            .await
    }

    pub async fn create_treatment_plan(&self, input: &TreatmentPlanInput) -> Result<TreatmentPlan, ApiError> {
        self.post_json("/medications/treatment-plans", input).await
    }

    pub async fn update_treatment_plan(
        &self,
        id: i64,
        input: &TreatmentPlanInput,
    ) -> Result<TreatmentPlan, ApiError> {
        self.put_json(&format!("/medications/treatment-plans/{}", id), input)
            .await
    }

    pub async fn delete_treatment_plan(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/medications/treatment-plans/{}", id))
            .await
    }

    pub async fn medication_counseling(&self, medication: &str) -> Result<CounselingResponse, ApiError> {
        self.post_json("/medications/counseling", &json!({ "medication": medication }))
            .await
    }
}
