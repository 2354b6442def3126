use serde::Serialize;

/// Free-form question for `POST /dashboard/metrics/ask-llm`
#[derive(Debug, Clone, Serialize)]
pub struct MetricsQuestion {
    pub question: String,
}
