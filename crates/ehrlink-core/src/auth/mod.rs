//! Credential storage for the session tokens.
//!
//! This module provides:
//! - `CredentialStore`: the get/set/clear seam the API client is built on
//! - `KeyringStore`: OS-level credential storage via keyring
//! - `FileStore`: a JSON session file in the cache directory
//! - `MemoryStore`: process-local storage, also used as a test double
//!
//! The client reads the access token through this trait on every dispatch,
//! so whatever a store returns is what goes on the wire.

pub mod credentials;
pub mod session;

pub use credentials::{CredentialStore, KeyringStore, MemoryStore, TokenKind};
pub use session::{FileStore, SessionTokens};
