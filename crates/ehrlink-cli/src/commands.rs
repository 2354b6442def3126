use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use ehrlink_core::chat::ChatThread;
use ehrlink_core::models::MessageRole;
use ehrlink_core::{ApiClient, ApiRequest, Config, Method};

use crate::cli::{Command, ConfigAction};

pub async fn dispatch(api: &ApiClient, config: &mut Config, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => login(api, config, username, password).await,
        Command::Logout => {
            api.logout().await?;
            println!("Logged out.");
            Ok(())
        }
        Command::Status => status(api, config).await,
        Command::Request {
            method,
            path,
            data,
            query,
        } => raw_request(api, &method, &path, data.as_deref(), query).await,
        Command::Patients { search } => patients(api, search.as_deref()).await,
        Command::Appointments { patient } => appointments(api, patient).await,
        Command::Invoices { patient } => invoices(api, patient).await,
        Command::Rooms => rooms(api).await,
        Command::Chat { room_id, message } => chat(api, room_id, &message).await,
        Command::Config { action } => self::config(config, action),
    }
}

async fn login(
    api: &ApiClient,
    config: &mut Config,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = match username.or_else(|| config.last_username.clone()) {
        Some(u) => u,
        None => prompt("Username: ")?,
    };
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password(format!("Password for {}: ", username))
            .context("Failed to read password")?,
    };

    let response = api.login(&username, &password).await?;
    match response.user {
        Some(user) => println!("Logged in as {} ({}).", user.username, user.role_display()),
        None => println!("Logged in as {}.", username),
    }

    config.last_username = Some(username);
    config.save().context("Failed to save config")?;
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let value = line.trim().to_string();
    if value.is_empty() {
        bail!("No username given");
    }
    Ok(value)
}

async fn status(api: &ApiClient, config: &Config) -> Result<()> {
    println!("Backend:  {}", api.base_url());
    println!("Storage:  {:?}", config.credential_backend);
    if !api.is_authenticated() {
        println!("Session:  not logged in");
        return Ok(());
    }
    // Goes through the refresh path, so an expired access token is renewed here
    let user = api.profile().await?;
    println!("Session:  logged in as {} ({})", user.username, user.role_display());
    Ok(())
}

fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method: {}", method))
}

async fn raw_request(
    api: &ApiClient,
    method: &str,
    path: &str,
    data: Option<&str>,
    query: Vec<(String, String)>,
) -> Result<()> {
    let mut request = ApiRequest::new(parse_method(method)?, path);
    if let Some(data) = data {
        let body: serde_json::Value =
            serde_json::from_str(data).context("--data is not valid JSON")?;
        request = request.body(body);
    }
    for (key, value) in query {
        request = request.query(key, value);
    }

    let response = api.request(request).await?;
    let value = response.value()?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn patients(api: &ApiClient, search: Option<&str>) -> Result<()> {
    let mut patients = match search {
        Some(q) => api.search_patients(q).await?,
        None => api.list_patients().await?,
    };
    patients.sort_by_key(|p| p.sort_name().to_lowercase());

    for p in &patients {
        println!(
            "{:>6}  {:<32}  {:<12}  {}",
            p.id,
            p.sort_name(),
            p.date_of_birth.as_deref().unwrap_or("-"),
            p.medical_record_number.as_deref().unwrap_or("")
        );
    }
    println!("{} patient(s)", patients.len());
    Ok(())
}

async fn appointments(api: &ApiClient, patient: Option<i64>) -> Result<()> {
    let appointments = api.list_appointments(patient).await?;
    for a in &appointments {
        println!(
            "{:>6}  patient {:<6}  {:<20}  {:<10}  {}",
            a.id,
            a.patient_id,
            a.appointment_datetime.as_deref().unwrap_or("-"),
            a.status.as_deref().unwrap_or("-"),
            a.reason.as_deref().unwrap_or("")
        );
    }
    println!("{} appointment(s)", appointments.len());
    Ok(())
}

async fn invoices(api: &ApiClient, patient: Option<i64>) -> Result<()> {
    let invoices = api.list_invoices(patient).await?;
    for i in &invoices {
        println!(
            "{:>6}  {:>10.2}  balance {:>10.2}  {}",
            i.id,
            i.amount,
            i.balance(),
            i.status.as_deref().unwrap_or("-")
        );
    }
    let outstanding: f64 = invoices.iter().map(|i| i.balance()).sum();
    println!("{} invoice(s), {:.2} outstanding", invoices.len(), outstanding);
    Ok(())
}

async fn rooms(api: &ApiClient) -> Result<()> {
    for room in api.list_rooms().await? {
        println!("{:>6}  {}", room.id, room.name);
    }
    Ok(())
}

async fn chat(api: &ApiClient, room_id: i64, message: &str) -> Result<()> {
    let mut thread = ChatThread::new(room_id);
    api.sync_thread(&mut thread).await?;

    match api.send_to_thread(&mut thread, message, MessageRole::User).await? {
        Some(reply) => println!("{}", reply),
        None => bail!("Message is empty"),
    }
    Ok(())
}

fn config(config: &mut Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("Config file:   {}", Config::config_path()?.display());
            println!("Base URL:      {}", config.resolved_base_url());
            println!("Backend:       {:?}", config.credential_backend);
            println!("Timeouts:      request {:?}, refresh {:?}", config.request_timeout(), config.refresh_timeout());
            if let Some(ref user) = config.last_username {
                println!("Last username: {}", user);
            }
            return Ok(());
        }
        ConfigAction::SetBaseUrl { url } => {
            config.api_base_url = Some(ehrlink_core::config::normalize_base_url(&url));
        }
        ConfigAction::SetBackend { backend } => {
            config.credential_backend = backend;
        }
    }
    config.save().context("Failed to save config")?;
    println!("Saved.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("get").unwrap(), Method::GET);
        assert_eq!(parse_method(" Delete ").unwrap(), Method::DELETE);
        assert!(parse_method("NOT A METHOD").is_err());
    }

    #[tokio::test]
    async fn test_config_show_dispatched_without_session() {
        let store = std::sync::Arc::new(ehrlink_core::MemoryStore::new());
        let api = ApiClient::new(ehrlink_core::ClientOptions::new("http://127.0.0.1:9"), store).unwrap();
        let mut config = Config::default();

        let command = Command::Config {
            action: ConfigAction::Show,
        };
        dispatch(&api, &mut config, command).await.unwrap();
    }
}
