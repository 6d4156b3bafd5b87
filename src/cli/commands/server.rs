use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_client_config, ping_server, save_client_config, ServerStatus};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at a server URL")]
    Use {
        #[arg(help = "Server URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Show the currently selected server")]
    Current,

    #[command(about = "Health check the current server")]
    Ping,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Use { url } => {
            let url = url.trim_end_matches('/').to_string();

            let mut config = load_client_config()?;
            let switching = config.server_url.as_deref() != Some(url.as_str());
            config.server_url = Some(url.clone());
            // A saved token belongs to the previous server
            if switching {
                config.token = None;
                config.email = None;
            }
            save_client_config(&config)?;

            let status = ping_server(&url).await;
            output_success(
                &output_format,
                &format!("Using server {}", url),
                Some(json!({ "server": url, "status": status })),
            )
        }
        ServerCommands::Current => {
            let config = load_client_config()?;
            match config.server_url {
                Some(url) => output_success(
                    &output_format,
                    &format!("Current server: {}", url),
                    Some(json!({ "server": url })),
                ),
                None => anyhow::bail!("No server configured; run `jotter server use <url>` first"),
            }
        }
        ServerCommands::Ping => {
            let config = load_client_config()?;
            let url = config
                .server_url
                .ok_or_else(|| anyhow::anyhow!("No server configured; run `jotter server use <url>` first"))?;

            let status = ping_server(&url).await;
            let message = match status {
                ServerStatus::Up => format!("{} is up", url),
                ServerStatus::Down => format!("{} is down", url),
            };
            output_success(
                &output_format,
                &message,
                Some(json!({ "server": url, "status": status })),
            )
        }
    }
}
