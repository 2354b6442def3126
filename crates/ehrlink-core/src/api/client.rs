//! API client for communicating with the EHR REST API.
//!
//! `ApiClient::request` is the single entry point every call goes through:
//! the access token is read from the credential store at dispatch time, a
//! 401 leads to at most one refresh-and-retry cycle, and a failed refresh
//! leaves the store empty.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::auth::{CredentialStore, TokenKind};
use crate::config::{
    normalize_base_url, Config, DEFAULT_REFRESH_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::models::user::is_plausible_email;
use crate::models::{LoginRequest, LoginResponse, RegisterInput, User};

use super::refresh::{self, RefreshCoordinator};
use super::{ApiError, ApiRequest, ApiResponse};

/// Connection settings, resolved from `Config` or given directly.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub request_timeout: Duration,
    pub refresh_timeout: Duration,
}

impl ClientOptions {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            refresh_timeout: Duration::from_secs(DEFAULT_REFRESH_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.resolved_base_url(),
            request_timeout: config.request_timeout(),
            refresh_timeout: config.refresh_timeout(),
        }
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }
}

/// API client for the EHR backend.
/// Clone is cheap - the reqwest client, the store and the refresh gate are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
    store: Arc<dyn CredentialStore>,
    refresher: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Create a new API client on top of the given credential store
    pub fn new(options: ClientOptions, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: Arc::from(options.base_url.as_str()),
            store,
            refresher: Arc::new(RefreshCoordinator::new(options.refresh_timeout)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// True when an access token is stored. Says nothing about whether the
    /// backend still accepts it.
    pub fn is_authenticated(&self) -> bool {
        refresh::read(self.store.as_ref(), TokenKind::Access).is_some()
    }

    /// Send `request`, transparently recovering from one expired access token.
    ///
    /// Non-2xx responses become errors. A 401 is answered with a single
    /// refresh-token exchange and a single resubmission; whatever that
    /// resubmission yields is final.
    pub async fn request(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let token = refresh::read(self.store.as_ref(), TokenKind::Access);
        let response = self.dispatch(&request, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return response.into_result();
        }
        if request.is_retried() {
            return Err(ApiError::Unauthorized);
        }

        request.mark_retried();
        debug!(method = %request.method(), path = request.path(), "Got 401, refreshing access token");

        let fresh = self
            .refresher
            .refresh(&self.client, &self.base_url, self.store.as_ref(), token.as_deref())
            .await?;

        let retry = self.dispatch(&request, Some(&fresh)).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            warn!(path = request.path(), "Still unauthorized after token refresh");
            return Err(ApiError::Unauthorized);
        }
        retry.into_result()
    }

    /// Put one request on the wire with the given bearer token.
    /// A caller-supplied Authorization header only survives when there is no token.
    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiResponse, ApiError> {
        let url = request.url(&self.base_url);
        debug!(
            method = %request.method(),
            url = %url,
            authenticated = token.is_some(),
            retried = request.is_retried(),
            "Dispatching request"
        );

        let mut headers = request.headers().clone();
        if token.is_some() {
            headers.remove(header::AUTHORIZATION);
        }

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(headers)
            .header(header::ACCEPT, "application/json");
        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.json_body() {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        ApiResponse::read(response).await
    }

    // ===== Typed helpers =====

    /// Send a request and decode the JSON response body
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.request(request).await?.json()
    }

    /// Send a request and ignore the response body
    pub async fn execute(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.request(request).await.map(|_| ())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(ApiRequest::get(path)).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(path)).await
    }

    // ===== Session =====

    /// Log in and store both returned tokens.
    ///
    /// Sent without any bearer token and outside the refresh path: a 401
    /// here means the credentials were rejected.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = ApiRequest::post("/auth/login").url(&self.base_url);
        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let login: LoginResponse = ApiResponse::read(response).await?.into_result()?.json()?;

        self.store
            .store_session(&login.access_token, &login.refresh_token)
            .map_err(|e| ApiError::Store(format!("{:#}", e)))?;

        info!(username = username, "Logged in");
        Ok(login)
    }

    /// Tell the backend we are leaving, then forget the tokens.
    /// The store is cleared even when the server call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if self.is_authenticated() {
            if let Err(e) = self.execute(ApiRequest::post("/auth/logout")).await {
                warn!(error = %e, "Logout request failed, clearing local session anyway");
            }
        }
        self.store
            .clear()
            .map_err(|e| ApiError::Store(format!("{:#}", e)))?;
        info!("Logged out");
        Ok(())
    }

    /// Create an account. The email is trimmed and sanity-checked first.
    pub async fn register(&self, mut input: RegisterInput) -> Result<User, ApiError> {
        input.email = input.email.trim().to_string();
        if !is_plausible_email(&input.email) {
            return Err(ApiError::InvalidInput(format!(
                "Invalid email address: {}",
                input.email
            )));
        }
        self.post_json("/auth/register", &input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;

    fn client(base_url: &str, store: Arc<MemoryStore>) -> ApiClient {
        ApiClient::new(ClientOptions::new(base_url), store).unwrap()
    }

    #[test]
    fn test_options_normalize_base_url() {
        let options = ClientOptions::new(" http://localhost:5001/api/ ");
        assert_eq!(options.base_url, "http://localhost:5001/api");
        assert_eq!(options.refresh_timeout, Duration::from_secs(10));

        // Defaults agree with an empty config file
        let config = Config::default();
        assert_eq!(options.request_timeout, config.request_timeout());
        assert_eq!(options.refresh_timeout, config.refresh_timeout());
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email_without_network() {
        let api = client("http://127.0.0.1:9", Arc::new(MemoryStore::new()));
        let result = api
            .register(RegisterInput::new("nurse1", "not-an-email", "Secret123!"))
            .await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_caller_authorization_header_replaced_by_stored_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/profile")
            .match_header("authorization", "Bearer stored")
            .with_status(200)
            .with_body(r#"{"id": 1, "username": "admin", "role": "admin"}"#)
            .create_async()
            .await;

        let api = client(&server.url(), Arc::new(MemoryStore::with_tokens(Some("stored"), None)));
        let request = ApiRequest::get("/auth/profile").header(
            header::AUTHORIZATION,
            header::HeaderValue::from_static("Bearer caller"),
        );
        let user: User = api.fetch(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(user.username, "admin");
    }

    #[tokio::test]
    async fn test_unauthenticated_request_has_no_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let api = client(&server.url(), Arc::new(MemoryStore::new()));
        let body: serde_json::Value = api.get_json("/health").await.unwrap();

        mock.assert_async().await;
        assert_eq!(body["status"], "ok");
        assert!(!api.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_store_even_if_server_fails() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/logout")
            .with_status(500)
            .create_async()
            .await;

        let store = Arc::new(MemoryStore::with_tokens(Some("acc"), Some("ref")));
        let api = client(&server.url(), store.clone());
        api.logout().await.unwrap();

        mock.assert_async().await;
        assert_eq!(store.get(TokenKind::Access).unwrap(), None);
        assert_eq!(store.get(TokenKind::Refresh).unwrap(), None);
    }
}
