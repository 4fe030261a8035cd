//! The request primitive and its HTTP implementation.
//!
//! Everything above this module talks to the service through
//! [`Transport::do_request`]: a method, a workspace-relative path and an
//! optional JSON body in, raw response bytes or an error out. Connection
//! pooling, TLS and timeouts live entirely below this seam.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use segform_core::ClientConfig;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Executes one request against the Config API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `body` (if any) to `path` and return the raw response body.
    ///
    /// Non-success statuses are reported as [`ClientError::Remote`].
    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Vec<u8>>;
}

/// [`Transport`] over HTTPS with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL without trailing slash.
    base_url: String,
    access_token: String,
    http_client: Client,
}

impl HttpTransport {
    /// Build a transport from client configuration.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let access_token = config.access_token()?;
        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_http_client(
            &config.api_base_url,
            access_token,
            http_client,
        ))
    }

    /// Create a transport with a pre-built `reqwest::Client`.
    pub fn with_http_client(
        base_url: &str,
        access_token: impl Into<String>,
        http_client: Client,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Vec<u8>> {
        let url = self.url(path);
        debug!(method = %method, url = %url, "sending request");

        let mut builder = self
            .http_client
            .request(method.into(), &url)
            .bearer_auth(&self.access_token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            warn!(method = %method, url = %url, status = status.as_u16(), "request rejected");
            return Err(ClientError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(bytes.to_vec())
    }
}
