//! REST API client module for the EHR backend.
//!
//! This module provides the `ApiClient` for communicating with the EHR
//! REST API. Every request carries the access token currently held in the
//! credential store; a 401 triggers one refresh-token exchange and one
//! retry of the original request.

pub mod client;
pub mod error;
pub mod refresh;
pub mod request;
pub mod response;

pub use client::{ApiClient, ClientOptions};
pub use error::ApiError;
pub use request::ApiRequest;
pub use response::ApiResponse;

pub use reqwest::Method;
