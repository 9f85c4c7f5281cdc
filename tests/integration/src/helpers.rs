//! Test helpers for integration tests
//!
//! Spawns the HTTP server on an ephemeral port over an in-memory guild and
//! wraps the requests the host runtime would make.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use jail_api::{create_app, AppState};
use jail_common::AppConfig;
use jail_service::ServiceContextBuilder;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{jail_config, transcript_config};
use crate::mock_client::MockGuildClient;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub guild: Arc<MockGuildClient>,
    pub transcripts: TempDir,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server without a shared secret
    pub async fn start(guild: Arc<MockGuildClient>) -> Result<Self> {
        Self::start_with_secret(guild, None).await
    }

    /// Start a server that requires `secret` on /api/v1 routes
    pub async fn start_with_secret(guild: Arc<MockGuildClient>, secret: Option<&str>) -> Result<Self> {
        let transcripts = tempfile::tempdir()?;
        let config = test_config(&transcripts, secret)?;

        let service_context = ServiceContextBuilder::new()
            .client(guild.clone())
            .config(&config)
            .build()?;
        let app = create_app(AppState::new(service_context, config));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            guild,
            transcripts,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with a bearer secret
    pub async fn post_auth<T: Serialize>(&self, path: &str, secret: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {secret}"))
            .json(body)
            .send()
            .await?)
    }
}

/// Configuration for a test server
///
/// `DISCORD_TOKEN` is the only required variable; the jail settings are then
/// pointed at the fixture guild.
pub fn test_config(transcripts: &TempDir, secret: Option<&str>) -> Result<AppConfig> {
    let mut config = AppConfig::from_lookup(|key| match key {
        "DISCORD_TOKEN" => Some("test-token".to_string()),
        "RATE_LIMIT_REQUESTS_PER_SECOND" => Some("1000".to_string()),
        "RATE_LIMIT_BURST" => Some("1000".to_string()),
        _ => None,
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    config.jail = jail_config();
    config.transcripts = transcript_config(transcripts.path());
    config.api.shared_secret = secret.map(str::to_string);
    Ok(config)
}

/// Poll `check` until it holds or `timeout` passes
pub async fn wait_until<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {}, got {}. Body: {}", expected_status, status, body);
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {}, got {}. Body: {}", expected_status, status, body);
    }
    Ok(())
}
