use std::io::Write;

use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::{load_client_config, save_client_config};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account and log in")]
    Signup {
        #[arg(help = "Email address")]
        email: String,
        #[arg(help = "First name")]
        first_name: String,
        #[arg(help = "Last name")]
        last_name: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Log in and save the session token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Discard the saved session token")]
    Logout,

    #[command(about = "Show the current user's profile")]
    Whoami,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Signup {
            email,
            first_name,
            last_name,
            password,
        } => {
            let password = resolve_password(password)?;
            let client = ApiClient::from_config()?;

            let envelope = client
                .post(
                    "/api/auth/signup",
                    &json!({
                        "email": email,
                        "password": password,
                        "firstName": first_name,
                        "lastName": last_name,
                    }),
                )
                .await?;

            save_session(&envelope)?;
            output_success(
                &output_format,
                &format!("Registered and logged in as {}", email),
                envelope.get("data").cloned().map(|data| json!({ "data": data })),
            )
        }
        AuthCommands::Login { email, password } => {
            let password = resolve_password(password)?;
            let client = ApiClient::from_config()?;

            let envelope = client
                .post(
                    "/api/auth/login",
                    &json!({ "email": email, "password": password }),
                )
                .await?;

            save_session(&envelope)?;
            output_success(
                &output_format,
                &format!("Logged in as {}", email),
                envelope.get("data").cloned().map(|data| json!({ "data": data })),
            )
        }
        AuthCommands::Logout => {
            let mut config = load_client_config()?;
            config.token = None;
            config.email = None;
            save_client_config(&config)?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            let client = ApiClient::from_config()?;
            client.require_token()?;

            let envelope = client.get("/api/auth/profile").await?;
            let user = envelope.get("data").cloned().unwrap_or(Value::Null);
            let email = user.get("email").and_then(Value::as_str).unwrap_or("-");

            output_success(
                &output_format,
                &format!("Logged in as {}", email),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Status => {
            let config = load_client_config()?;
            let server = config.server_url.as_deref().unwrap_or("(none)");
            let message = match &config.email {
                Some(email) => format!("Server {}; logged in as {}", server, email),
                None => format!("Server {}; not logged in", server),
            };
            output_success(
                &output_format,
                &message,
                Some(json!({
                    "server": config.server_url,
                    "email": config.email,
                    "logged_in": config.token.is_some(),
                })),
            )
        }
    }
}

/// Persist the token and email from a signup/login envelope
fn save_session(envelope: &Value) -> anyhow::Result<()> {
    let data = envelope
        .get("data")
        .ok_or_else(|| anyhow::anyhow!("malformed response: missing data"))?;
    let token = data
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("malformed response: missing token"))?;
    let email = data
        .get("user")
        .and_then(|u| u.get("email"))
        .and_then(Value::as_str);

    let mut config = load_client_config()?;
    config.token = Some(token.to_string());
    config.email = email.map(str::to_string);
    save_client_config(&config)?;
    Ok(())
}

fn resolve_password(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("Password is required");
    }
    Ok(password)
}
