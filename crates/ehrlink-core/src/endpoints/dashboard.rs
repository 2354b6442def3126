//! Admin dashboard metrics and the LLM pass-through.
//!
//! Metric payloads change with the backend's analytics, so they are handed
//! back as raw JSON.

use serde_json::Value;

use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::MetricsQuestion;

impl ApiClient {
    // ===== Metrics =====

    pub async fn total_users(&self) -> Result<Value, ApiError> {
        self.get_json("/dashboard/metrics/users/total").await
    }

    pub async fn daily_active_users(&self, days: Option<u32>) -> Result<Value, ApiError> {
        self.fetch(ApiRequest::get("/dashboard/metrics/users/daily-active").query_opt("days", days))
            .await
    }

    pub async fn api_call_metrics(&self, hours: Option<u32>) -> Result<Value, ApiError> {
        self.fetch(ApiRequest::get("/dashboard/metrics/api-calls").query_opt("hours", hours))
            .await
    }

    pub async fn total_llm_queries(&self, hours: Option<u32>) -> Result<Value, ApiError> {
        self.fetch(ApiRequest::get("/dashboard/metrics/llm-queries/total").query_opt("hours", hours))
            .await
    }

    pub async fn llm_queries_by_model(&self, hours: Option<u32>) -> Result<Value, ApiError> {
        self.fetch(ApiRequest::get("/dashboard/metrics/llm-queries/by-model").query_opt("hours", hours))
            .await
    }

    pub async fn metrics_summary(&self, hours: Option<u32>) -> Result<Value, ApiError> {
        self.fetch(ApiRequest::get("/dashboard/metrics/summary").query_opt("hours", hours))
            .await
    }

    /// Ask the backend's model a question about the current metrics
    pub async fn ask_about_metrics(&self, question: &str) -> Result<Value, ApiError> {
        let body = MetricsQuestion {
            question: question.to_string(),
        };
        self.post_json("/dashboard/metrics/ask-llm", &body).await
    }

    // ===== LLM =====

    /// Chat completion; request and response are passed through unchanged
    pub async fn llm_chat(&self, payload: &Value) -> Result<Value, ApiError> {
        self.post_json("/llm/chat", payload).await
    }

    pub async fn llm_health(&self) -> Result<Value, ApiError> {
        self.get_json("/llm/health").await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::ClientOptions;
    use crate::auth::MemoryStore;

    #[tokio::test]
    async fn test_metrics_window_sent_as_query() {
        let mut server = mockito::Server::new_async().await;
        let with_window = server
            .mock("GET", "/dashboard/metrics/summary")
            .match_query(mockito::Matcher::UrlEncoded("hours".into(), "24".into()))
            .with_status(200)
            .with_body(r#"{"total_users": 12, "active_appointments": 3}"#)
            .create_async()
            .await;

        let store = Arc::new(MemoryStore::with_tokens(Some("acc"), None));
        let api = ApiClient::new(ClientOptions::new(server.url()), store).unwrap();
        let summary = api.metrics_summary(Some(24)).await.unwrap();

        with_window.assert_async().await;
        assert_eq!(summary["total_users"], 12);
    }

    #[tokio::test]
    async fn test_llm_chat_passes_payload_through() {
        let mut server = mockito::Server::new_async().await;
        let payload = serde_json::json!({"messages": [{"role": "user", "content": "hi"}]});
        let mock = server
            .mock("POST", "/llm/chat")
            .match_body(mockito::Matcher::Json(payload.clone()))
            .with_status(200)
            .with_body(r#"{"response": "hello"}"#)
            .create_async()
            .await;

        let store = Arc::new(MemoryStore::with_tokens(Some("acc"), None));
        let api = ApiClient::new(ClientOptions::new(server.url()), store).unwrap();
        let reply = api.llm_chat(&payload).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply["response"], "hello");
    }
}
