//! # Berryfi HTTP Executor
//!
//! Sends command batches to `POST {base}/commands` with reqwest.

use crate::config::BerryfiConfig;
use async_trait::async_trait;
use berryfi_core::{BerryfiError, Command, CommandExecutor, CommandOutcome};
use thiserror::Error;

/// Value of the `X-Client` header.
pub const CLIENT_NAME: &str = "Berryfi";

/// Errors from the HTTP transport layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Cannot reach Fibery.
    #[error("Cannot connect to Fibery at {0}")]
    ConnectionFailed(String),
    /// 401 Unauthorized - invalid or missing token.
    #[error("Unauthorized: invalid or missing API token")]
    Unauthorized,
    /// 429 Too Many Requests.
    #[error("Rate limited: too many requests")]
    RateLimited,
    /// Any other non-success status.
    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),
    /// Failed to parse the response body.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The HTTP client could not be built.
    #[error("Cannot build HTTP client: {0}")]
    Build(String),
}

impl From<ClientError> for BerryfiError {
    fn from(err: ClientError) -> Self {
        BerryfiError::Transport(err.to_string())
    }
}

/// Command executor backed by the Fibery HTTP API.
#[derive(Clone)]
pub struct HttpExecutor {
    http: reqwest::Client,
    url: String,
    token: String,
}

impl HttpExecutor {
    /// Build an executor for `config`.
    pub fn new(config: &BerryfiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(user_agent())
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            http,
            url: config.commands_url(),
            token: config.token.clone(),
        })
    }

    /// The command endpoint this executor posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the command request with token auth.
    fn request(&self, commands: &[Command]) -> reqwest::RequestBuilder {
        self.http
            .post(&self.url)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.token))
            .header("X-Client", CLIENT_NAME)
            .json(commands)
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.url)))
    }

    /// Check the status code and parse the outcome list.
    async fn handle_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<Vec<CommandOutcome>, ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::ServerError(status.as_u16(), body));
        }
        resp.json::<Vec<CommandOutcome>>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl CommandExecutor for HttpExecutor {
    async fn execute(&self, commands: &[Command]) -> Result<Vec<CommandOutcome>, BerryfiError> {
        let resp = self.send(self.request(commands)).await?;
        let outcomes = self.handle_response(resp).await?;
        tracing::debug!(commands = commands.len(), outcomes = outcomes.len(), "commands executed");
        Ok(outcomes)
    }
}

/// `Berryfi/<version> (<homepage>)`.
pub fn user_agent() -> String {
    format!(
        "{CLIENT_NAME}/{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_HOMEPAGE")
    )
}
