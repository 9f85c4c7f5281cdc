//! Thin REST client over reqwest
//!
//! Adds bot authorization, the audit-log reason header, and maps every
//! non-success response to a `DomainError`.

use std::time::Duration;

use jail_common::DiscordConfig;
use jail_core::error::DomainError;
use jail_core::traits::ClientResult;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{multipart, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{map_status_error, map_transport_error};

const AUDIT_LOG_REASON: &str = "X-Audit-Log-Reason";

/// REST client configuration
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub token: String,
    /// Base URL including the API version, e.g. `https://discord.com/api/v10`
    pub api_base: String,
    pub request_timeout: Duration,
}

impl From<&DiscordConfig> for RestConfig {
    fn from(config: &DiscordConfig) -> Self {
        Self {
            token: config.token.clone(),
            api_base: config.api_base.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// Authorized REST client
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base: String,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient").field("base", &self.base).finish()
    }
}

impl RestClient {
    /// Create a client with the bot token installed as default header
    pub fn new(config: &RestConfig) -> ClientResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bot {}", config.token))
            .map_err(|_| DomainError::ConfigurationMissing("valid DISCORD_TOKEN".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(
                "DiscordBot (https://github.com/jail-service, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .timeout(config.request_timeout)
            .build()
            .map_err(map_transport_error)?;

        tracing::info!(base = %config.api_base, "Discord REST client created");

        Ok(Self {
            http,
            base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str, reason: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base, path));
        match reason.map(encode_audit_reason) {
            Some(reason) if !reason.is_empty() => builder.header(AUDIT_LOG_REASON, reason),
            _ => builder,
        }
    }

    /// Send a request and return the body of a successful response
    async fn execute<F>(&self, builder: RequestBuilder, on_not_found: F) -> ClientResult<Vec<u8>>
    where
        F: FnOnce(Option<u32>) -> DomainError,
    {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let err = map_status_error(status, &headers, &body, on_not_found);
        tracing::debug!(status = status.as_u16(), error = %err, "Discord request failed");
        Err(err)
    }

    fn decode<T: DeserializeOwned>(body: &[u8]) -> ClientResult<T> {
        serde_json::from_slice(body)
            .map_err(|e| DomainError::InternalError(format!("Malformed response body: {e}")))
    }

    /// `GET` and decode JSON
    pub async fn get<T, F>(&self, path: &str, on_not_found: F) -> ClientResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(Option<u32>) -> DomainError,
    {
        let body = self.execute(self.request(Method::GET, path, None), on_not_found).await?;
        Self::decode(&body)
    }

    /// `GET` with query parameters and decode JSON
    pub async fn get_query<T, Q, F>(&self, path: &str, query: &Q, on_not_found: F) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        F: FnOnce(Option<u32>) -> DomainError,
    {
        let builder = self.request(Method::GET, path, None).query(query);
        let body = self.execute(builder, on_not_found).await?;
        Self::decode(&body)
    }

    /// `PUT` without body (204 expected)
    pub async fn put_empty<F>(&self, path: &str, reason: Option<&str>, on_not_found: F) -> ClientResult<()>
    where
        F: FnOnce(Option<u32>) -> DomainError,
    {
        let builder = self.request(Method::PUT, path, reason);
        self.execute(builder, on_not_found).await.map(|_| ())
    }

    /// `DELETE` (204 expected)
    pub async fn delete<F>(&self, path: &str, reason: Option<&str>, on_not_found: F) -> ClientResult<()>
    where
        F: FnOnce(Option<u32>) -> DomainError,
    {
        let builder = self.request(Method::DELETE, path, reason);
        self.execute(builder, on_not_found).await.map(|_| ())
    }

    /// `POST` a JSON body, ignoring the response body
    pub async fn post_json<B, F>(&self, path: &str, body: &B, on_not_found: F) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
        F: FnOnce(Option<u32>) -> DomainError,
    {
        let builder = self.request(Method::POST, path, None).json(body);
        self.execute(builder, on_not_found).await.map(|_| ())
    }

    /// `POST` a JSON body and decode the JSON response
    pub async fn post_json_for<B, T, F>(&self, path: &str, body: &B, on_not_found: F) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
        F: FnOnce(Option<u32>) -> DomainError,
    {
        let builder = self.request(Method::POST, path, None).json(body);
        let body = self.execute(builder, on_not_found).await?;
        Self::decode(&body)
    }

    /// `POST` a multipart form and decode the JSON response
    pub async fn post_multipart<T, F>(&self, path: &str, form: multipart::Form, on_not_found: F) -> ClientResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(Option<u32>) -> DomainError,
    {
        let builder = self.request(Method::POST, path, None).multipart(form);
        let body = self.execute(builder, on_not_found).await?;
        Self::decode(&body)
    }
}

/// Percent-encode a reason for the audit-log header (UTF-8, unreserved kept)
pub fn encode_audit_reason(reason: &str) -> String {
    let mut out = String::with_capacity(reason.len());
    for byte in reason.trim().bytes().take(512) {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~' | b' ') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
