//! Typed per-domain calls on top of `ApiClient`.
//!
//! Each submodule adds an `impl ApiClient` block that only maps a path and
//! a payload to a model type. All of them go through `ApiClient::request`
//! and therefore share its token handling.

mod auth;
mod billing;
mod chat;
mod clinical;
mod dashboard;
mod medications;
mod patients;
mod video;
