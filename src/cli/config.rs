use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Client-side state: which server the CLI talks to and the saved session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server_url: Option<String>,
    pub token: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Up,
    Down,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("JOTTER_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("jotter").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_client_config() -> anyhow::Result<ClientConfig> {
    let config_dir = get_config_dir()?;
    let client_file = config_dir.join("client.json");

    if !client_file.exists() {
        return Ok(ClientConfig::default());
    }

    let content = fs::read_to_string(client_file)?;
    let config: ClientConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_client_config(config: &ClientConfig) -> anyhow::Result<()> {
    let config_dir = get_config_dir()?;
    let client_file = config_dir.join("client.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(client_file, content)?;
    Ok(())
}

pub async fn ping_server(base_url: &str) -> ServerStatus {
    let client = reqwest::Client::new();
    let url = format!("{}/health", base_url.trim_end_matches('/'));

    match client
        .get(&url)
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => ServerStatus::Up,
        _ => ServerStatus::Down,
    }
}
