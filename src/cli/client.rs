use anyhow::{bail, Context, Result};
use reqwest::Method;
use serde_json::Value;

use crate::cli::config::load_client_config;

/// Thin HTTP client over the Jotter API, configured from the saved client
/// config (server URL + optional bearer token)
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn from_config() -> Result<Self> {
        let config = load_client_config()?;
        let base_url = config
            .server_url
            .context("No server configured; run `jotter server use <url>` first")?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: config.token,
        })
    }

    pub fn require_token(&self) -> Result<()> {
        if self.token.is_none() {
            bail!("Not logged in; run `jotter auth login` first");
        }
        Ok(())
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, None).await
    }

    /// Send a request and unwrap the API envelope, turning error envelopes
    /// into CLI errors carrying the server's message
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);

        let mut request = self.http.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        let envelope: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = envelope
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("request failed");
            bail!("{} ({})", message, status);
        }

        Ok(envelope)
    }
}
