use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use keyring::Entry;

/// Default keychain service name
const SERVICE_NAME: &str = "ehrlink";

/// The two credentials that make up a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub const ALL: [TokenKind; 2] = [TokenKind::Access, TokenKind::Refresh];

    /// Storage key for this token
    pub fn key(self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }
}

/// Persistence boundary for session tokens.
///
/// Implementations must be safe to share between concurrent requests. Reads
/// always go to the backing medium; the client never caches a token between
/// requests.
pub trait CredentialStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Result<Option<String>>;

    fn set(&self, kind: TokenKind, value: &str) -> Result<()>;

    fn remove(&self, kind: TokenKind) -> Result<()>;

    /// Write both tokens of a fresh login
    fn store_session(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.set(TokenKind::Access, access_token)?;
        self.set(TokenKind::Refresh, refresh_token)
    }

    /// Remove both tokens. Both removals are attempted even if the first fails.
    fn clear(&self) -> Result<()> {
        let access = self.remove(TokenKind::Access);
        let refresh = self.remove(TokenKind::Refresh);
        access.and(refresh)
    }
}

/// Tokens kept in the OS keychain, one entry per token kind.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a custom service name, e.g. to keep several backends apart
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, kind: TokenKind) -> Result<Entry> {
        Entry::new(&self.service, kind.key()).context("Failed to create keyring entry")
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        match self.entry(kind)?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        self.entry(kind)?
            .set_password(value)
            .context("Failed to store token in keychain")
    }

    fn remove(&self, kind: TokenKind) -> Result<()> {
        match self.entry(kind)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

/// Tokens held in process memory only.
#[derive(Default)]
pub struct MemoryStore {
    tokens: Mutex<HashMap<TokenKind, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store, handy for tests and one-shot scripts
    pub fn with_tokens(access_token: Option<&str>, refresh_token: Option<&str>) -> Self {
        let mut tokens = HashMap::new();
        if let Some(t) = access_token {
            tokens.insert(TokenKind::Access, t.to_string());
        }
        if let Some(t) = refresh_token {
            tokens.insert(TokenKind::Refresh, t.to_string());
        }
        Self {
            tokens: Mutex::new(tokens),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<TokenKind, String>>> {
        self.tokens
            .lock()
            .map_err(|_| anyhow!("Credential store lock poisoned"))
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        Ok(self.lock()?.get(&kind).cloned())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        self.lock()?.insert(kind, value.to_string());
        Ok(())
    }

    fn remove(&self, kind: TokenKind) -> Result<()> {
        self.lock()?.remove(&kind);
        Ok(())
    }
}
