//! ehrlink - command line client for an EHR REST backend.
//!
//! Logs in once, keeps the session tokens in the configured credential
//! store, and lets every later command ride on the shared API client with
//! its automatic token refresh.

mod cli;
mod commands;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ehrlink_core::{
    ApiClient, ApiError, ClientOptions, Config, CredentialBackend, CredentialStore, FileStore,
    KeyringStore, MemoryStore,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

/// Exit code when the session is gone and the user must log in again
const EXIT_AUTH_REQUIRED: u8 = 2;

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Build the credential store selected on the command line or in the config
fn open_store(backend: CredentialBackend, config: &Config) -> Result<Arc<dyn CredentialStore>> {
    let store: Arc<dyn CredentialStore> = match backend {
        CredentialBackend::Keyring => Arc::new(KeyringStore::new()),
        CredentialBackend::File => Arc::new(FileStore::new(config.cache_dir()?)),
        CredentialBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_auth_failure) {
                eprintln!("Error: {}", e);
                eprintln!("Your session has ended. Run `ehrlink login` to sign in again.");
                ExitCode::from(EXIT_AUTH_REQUIRED)
            } else {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("Failed to load config")?;

    let backend = cli.backend.unwrap_or(config.credential_backend);
    let store = open_store(backend, &config)?;

    let mut options = ClientOptions::from_config(&config);
    if let Some(ref url) = cli.base_url {
        options.base_url = ehrlink_core::config::normalize_base_url(url);
    }
    info!(base_url = %options.base_url, backend = ?backend, "ehrlink starting");

    let api = ApiClient::new(options, store)?;
    debug!(authenticated = api.is_authenticated(), "Client ready");

    commands::dispatch(&api, &mut config, cli.command).await
}
