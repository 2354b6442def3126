//! Refresh-token exchange with single-flight coordination.
//!
//! Concurrent requests that hit a 401 funnel through one gate. The first
//! one in performs `POST /auth/refresh`; the others find a different access
//! token in the store once they get the gate and reuse it, or find an
//! empty store after a failed refresh and give up without another call.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::{CredentialStore, TokenKind};

use super::ApiError;

/// Refresh endpoint, relative to the API base URL
pub const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    /// Only present when the backend rotates refresh tokens
    #[serde(default)]
    refresh_token: Option<String>,
}

pub(crate) struct RefreshCoordinator {
    gate: Mutex<()>,
    timeout: Duration,
}

impl RefreshCoordinator {
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            gate: Mutex::new(()),
            timeout,
        }
    }

    /// Obtain an access token to replace `stale_token`, the one a request
    /// was rejected with.
    ///
    /// On any failure the credential store is cleared before returning.
    pub(crate) async fn refresh(
        &self,
        http: &Client,
        base_url: &str,
        store: &dyn CredentialStore,
        stale_token: Option<&str>,
    ) -> Result<String, ApiError> {
        let _gate = self.gate.lock().await;

        if let Some(current) = read(store, TokenKind::Access) {
            if stale_token != Some(current.as_str()) {
                debug!("Access token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        // An unreadable store is not an absent token; leave the session alone
        let refresh_token = match store.get(TokenKind::Refresh) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                debug!("No refresh token stored, ending session");
                clear(store);
                return Err(ApiError::Unauthorized);
            }
            Err(e) => {
                warn!(error = %e, "Failed to read refresh token, keeping session");
                return Err(ApiError::Store(format!("{:#}", e)));
            }
        };

        let url = format!("{}{}", base_url.trim_end_matches('/'), REFRESH_PATH);
        let exchange = tokio::time::timeout(self.timeout, exchange(http, &url, &refresh_token));
        let result = match exchange.await {
            Ok(result) => result,
            Err(_) => Err(format!("timed out after {}s", self.timeout.as_secs_f32())),
        };

        match result {
            Ok(tokens) => {
                if let Err(e) = store.set(TokenKind::Access, &tokens.access_token) {
                    warn!(error = %e, "Failed to persist refreshed access token");
                    return Err(ApiError::Store(format!("{:#}", e)));
                }
                if let Some(ref rotated) = tokens.refresh_token {
                    if let Err(e) = store.set(TokenKind::Refresh, rotated) {
                        warn!(error = %e, "Failed to persist rotated refresh token");
                    }
                }
                info!("Access token refreshed");
                Ok(tokens.access_token)
            }
            Err(reason) => {
                warn!(reason = %reason, "Token refresh failed, clearing credentials");
                clear(store);
                Err(ApiError::RefreshFailed(reason))
            }
        }
    }
}

/// The refresh call itself. Authenticated with the refresh token, never the
/// access token, and never routed back through the 401 handling.
async fn exchange(http: &Client, url: &str, refresh_token: &str) -> Result<RefreshResponse, String> {
    let response = http
        .post(url)
        .bearer_auth(refresh_token)
        .json(&serde_json::json!({}))
        .send()
        .await
        .map_err(|e| format!("network error: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, &body).to_string());
    }

    let tokens: RefreshResponse = response
        .json()
        .await
        .map_err(|e| format!("invalid refresh response: {}", e))?;
    if tokens.access_token.is_empty() {
        return Err("refresh response carried an empty access token".to_string());
    }
    Ok(tokens)
}

/// Store reads never fail a request; an unreadable token counts as absent
pub(crate) fn read(store: &dyn CredentialStore, kind: TokenKind) -> Option<String> {
    match store.get(kind) {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            warn!(token = kind.key(), error = %e, "Failed to read credential store");
            None
        }
    }
}

fn clear(store: &dyn CredentialStore) {
    if let Err(e) = store.clear() {
        warn!(error = %e, "Failed to clear credential store");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;

    fn coordinator() -> RefreshCoordinator {
        RefreshCoordinator::new(Duration::from_secs(5))
    }

    /// Wraps a `MemoryStore`, failing reads of the refresh token and/or
    /// every write
    struct FailingStore {
        inner: MemoryStore,
        fail_refresh_read: bool,
        fail_writes: bool,
    }

    impl CredentialStore for FailingStore {
        fn get(&self, kind: TokenKind) -> anyhow::Result<Option<String>> {
            if self.fail_refresh_read && kind == TokenKind::Refresh {
                anyhow::bail!("keychain locked");
            }
            self.inner.get(kind)
        }

        fn set(&self, kind: TokenKind, value: &str) -> anyhow::Result<()> {
            if self.fail_writes {
                anyhow::bail!("disk full");
            }
            self.inner.set(kind, value)
        }

        fn remove(&self, kind: TokenKind) -> anyhow::Result<()> {
            self.inner.remove(kind)
        }
    }

    #[tokio::test]
    async fn test_reuses_token_refreshed_elsewhere() {
        // No server involved: the stored token differs from the stale one
        let store = MemoryStore::with_tokens(Some("new"), Some("ref"));
        let token = coordinator()
            .refresh(&Client::new(), "http://127.0.0.1:9", &store, Some("old"))
            .await
            .unwrap();
        assert_eq!(token, "new");
    }

    #[tokio::test]
    async fn test_missing_refresh_token_clears_store() {
        let store = MemoryStore::with_tokens(Some("old"), None);
        let result = coordinator()
            .refresh(&Client::new(), "http://127.0.0.1:9", &store, Some("old"))
            .await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert_eq!(store.get(TokenKind::Access).unwrap(), None);
    }

    #[tokio::test]
    async fn test_rotated_refresh_token_persisted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", REFRESH_PATH)
            .match_header("authorization", "Bearer ref1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "acc2", "refresh_token": "ref2"}"#)
            .create_async()
            .await;

        let store = MemoryStore::with_tokens(Some("acc1"), Some("ref1"));
        let token = coordinator()
            .refresh(&Client::new(), &server.url(), &store, Some("acc1"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(token, "acc2");
        assert_eq!(store.get(TokenKind::Access).unwrap().as_deref(), Some("acc2"));
        assert_eq!(store.get(TokenKind::Refresh).unwrap().as_deref(), Some("ref2"));
    }

    #[tokio::test]
    async fn test_malformed_refresh_response_is_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", REFRESH_PATH)
            .with_status(200)
            .with_body(r#"{"token": "wrong-field"}"#)
            .create_async()
            .await;

        let store = MemoryStore::with_tokens(Some("acc1"), Some("ref1"));
        let result = coordinator()
            .refresh(&Client::new(), &server.url(), &store, Some("acc1"))
            .await;

        assert!(matches!(result, Err(ApiError::RefreshFailed(_))));
        assert_eq!(store.get(TokenKind::Refresh).unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreadable_refresh_token_keeps_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", REFRESH_PATH)
            .expect(0)
            .create_async()
            .await;

        let store = FailingStore {
            inner: MemoryStore::with_tokens(Some("acc1"), Some("ref-valid")),
            fail_refresh_read: true,
            fail_writes: false,
        };
        let result = coordinator()
            .refresh(&Client::new(), &server.url(), &store, Some("acc1"))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ApiError::Store(_))));
        assert_eq!(store.inner.get(TokenKind::Access).unwrap().as_deref(), Some("acc1"));
        assert_eq!(
            store.inner.get(TokenKind::Refresh).unwrap().as_deref(),
            Some("ref-valid")
        );
    }

    #[tokio::test]
    async fn test_unpersisted_access_token_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", REFRESH_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "acc2"}"#)
            .create_async()
            .await;

        let store = FailingStore {
            inner: MemoryStore::with_tokens(Some("acc1"), Some("ref1")),
            fail_refresh_read: false,
            fail_writes: true,
        };
        let result = coordinator()
            .refresh(&Client::new(), &server.url(), &store, Some("acc1"))
            .await;

        assert!(matches!(result, Err(ApiError::Store(ref m)) if m.contains("disk full")));
        assert_eq!(store.inner.get(TokenKind::Refresh).unwrap().as_deref(), Some("ref1"));
    }
}
