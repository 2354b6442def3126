use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{Patient, PatientInput};

impl ApiClient {
    pub async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.get_json("/patients").await
    }

    pub async fn get_patient(&self, id: i64) -> Result<Patient, ApiError> {
        self.get_json(&format!("/patients/{}", id)).await
    }

    pub async fn create_patient(&self, input: &PatientInput) -> Result<Patient, ApiError> {
        self.post_json("/patients/", input).await
    }

    pub async fn update_patient(&self, id: i64, input: &PatientInput) -> Result<Patient, ApiError> {
        self.put_json(&format!("/patients/{}", id), input).await
    }

    pub async fn delete_patient(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/patients/{}", id)).await
    }

    pub async fn search_patients(&self, query: &str) -> Result<Vec<Patient>, ApiError> {
        self.fetch(ApiRequest::get("/patients/search").query("query", query))
            .await
    }

    /// Free-form summary; the shape is backend-defined
    pub async fn patient_summary(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.get_json(&format!("/patients/{}/summary", id)).await
    }

    /// Patient record with protected health information masked
    pub async fn masked_patient(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.get_json(&format!("/patients/{}/mask_phi", id)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::api::{ApiClient, ClientOptions};
    use crate::auth::MemoryStore;

    #[tokio::test]
    async fn test_search_patients_query_param() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/patients/search")
            .match_query(mockito::Matcher::UrlEncoded("query".into(), "obi ada".into()))
            .match_header("authorization", "Bearer acc")
            .with_status(200)
            .with_body(r#"[{"id": 7, "first_name": "Ada", "last_name": "Obi"}]"#)
            .create_async()
            .await;

        let store = Arc::new(MemoryStore::with_tokens(Some("acc"), Some("ref")));
        let api = ApiClient::new(ClientOptions::new(server.url()), store).unwrap();
        let found = api.search_patients("obi ada").await.unwrap();

        mock.assert_async().await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name(), "Ada Obi");
    }
}
