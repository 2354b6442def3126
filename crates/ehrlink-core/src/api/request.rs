use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

/// An outbound call, independent of any particular endpoint.
///
/// The body is an opaque JSON value; the client never looks inside it. The
/// `retried` flag is owned by the client: it is set once, right before the
/// request is resubmitted after a token refresh, and never reset.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Value>,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidInput(format!("Unserializable request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn json_body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Whether this request has already been through a refresh-and-retry cycle
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Absolute URL for this request. Absolute paths are passed through.
    pub fn url(&self, base_url: &str) -> String {
        if self.path.starts_with("http://") || self.path.starts_with("https://") {
            return self.path.clone();
        }
        let base = base_url.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("{}{}", base, self.path)
        } else {
            format!("{}/{}", base, self.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let base = "http://localhost:5001/api/";
        assert_eq!(
            ApiRequest::get("/patients").url(base),
            "http://localhost:5001/api/patients"
        );
        assert_eq!(
            ApiRequest::get("patients/").url(base),
            "http://localhost:5001/api/patients/"
        );
        assert_eq!(
            ApiRequest::get("https://other.example/x").url(base),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_builder_collects_parts() {
        let req = ApiRequest::post("/chat/rooms")
            .json(&serde_json::json!({"name": "Cardiology"}))
            .unwrap()
            .query("page", 2)
            .query_opt("event_type", None::<&str>)
            .query_opt("per_page", Some(20));

        assert_eq!(*req.method(), Method::POST);
        assert_eq!(req.json_body().unwrap()["name"], "Cardiology");
        assert_eq!(
            req.query_pairs(),
            &[
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "20".to_string())
            ]
        );
        assert!(!req.is_retried());
    }

    #[test]
    fn test_retried_flag_survives_clone() {
        let mut req = ApiRequest::get("/patients");
        req.mark_retried();
        assert!(req.clone().is_retried());
    }
}
