//! ehrlink core - authenticated client for an EHR REST backend.
//!
//! The heart of this crate is [`ApiClient`], which attaches bearer tokens
//! read from an injected [`CredentialStore`], recovers from an expired
//! access token with a single refresh-and-retry cycle, and clears the
//! stored credentials when the refresh token is no longer accepted.
//!
//! The typed per-domain calls (patients, clinical, billing, chat, ...)
//! live in [`endpoints`] and only map paths to [`models`].

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod endpoints;
pub mod models;

pub use api::{ApiClient, ApiError, ApiRequest, ApiResponse, ClientOptions, Method};
pub use auth::{CredentialStore, FileStore, KeyringStore, MemoryStore, SessionTokens, TokenKind};
pub use config::{Config, CredentialBackend};
