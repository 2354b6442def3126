use clap::{Parser, Subcommand};
use ehrlink_core::CredentialBackend;

#[derive(Debug, Parser)]
#[command(name = "ehrlink", version, about = "Command line client for the EHR REST API")]
pub struct Cli {
    /// API base URL (overrides config and environment)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Where session tokens are kept: keyring, file or memory
    #[arg(long, global = true)]
    pub backend: Option<CredentialBackend>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session tokens
    Login {
        #[arg(short, long)]
        username: Option<String>,
        /// Read from EHRLINK_PASSWORD when set, otherwise prompted
        #[arg(long, env = "EHRLINK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show backend and session status
    Status,
    /// Send an arbitrary authenticated request and print the JSON response
    Request {
        /// HTTP method, e.g. GET or POST
        method: String,
        /// Path relative to the base URL, e.g. /patients
        path: String,
        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
        /// Query parameter as key=value; repeatable
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },
    /// List or search patients
    Patients {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List appointments
    Appointments {
        #[arg(short, long)]
        patient: Option<i64>,
    },
    /// List invoices with their balances
    Invoices {
        #[arg(short, long)]
        patient: Option<i64>,
    },
    /// List chat rooms
    Rooms,
    /// Send a chat message and print the bot reply
    Chat {
        room_id: i64,
        message: String,
    },
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    Show,
    SetBaseUrl { url: String },
    SetBackend { backend: CredentialBackend },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("patient_id=7").unwrap(),
            ("patient_id".to_string(), "7".to_string())
        );
        assert_eq!(
            parse_key_value("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_request_command_parses() {
        let cli = Cli::try_parse_from([
            "ehrlink", "request", "POST", "/chat/rooms", "--data", r#"{"name":"x"}"#, "-q", "a=1",
            "--backend", "file",
        ])
        .unwrap();
        assert_eq!(cli.backend, Some(CredentialBackend::File));
        match cli.command {
            Command::Request { method, path, data, query } => {
                assert_eq!(method, "POST");
                assert_eq!(path, "/chat/rooms");
                assert!(data.is_some());
                assert_eq!(query, vec![("a".to_string(), "1".to_string())]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
