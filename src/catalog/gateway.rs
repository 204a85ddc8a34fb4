use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, error};

use super::types::{CatalogRequest, ErrorEnvelope};
use crate::config::{Config, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Movie catalog credential is not configured")]
    MissingCredential,
    #[error("Missing required parameter: path")]
    MissingPath,
    #[error("Invalid catalog path: {0}")]
    InvalidPath(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Movie catalog returned status {status}")]
    Upstream { status: u16, details: Value },
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingCredential | GatewayError::Network(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::MissingPath | GatewayError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            GatewayError::MissingCredential => {
                ErrorEnvelope::new("Server configuration error: movie catalog API key is not set")
            }
            GatewayError::MissingPath => ErrorEnvelope::new("Missing required parameter: path"),
            GatewayError::InvalidPath(_) => ErrorEnvelope::new("Invalid parameter: path"),
            GatewayError::Network(_) => {
                ErrorEnvelope::new("Network error while contacting the movie catalog")
            }
            GatewayError::Upstream { details, .. } => ErrorEnvelope {
                message: "Movie catalog request failed".to_string(),
                details: Some(details),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Relays catalog requests to the movie provider with the server's bearer
/// token. One outbound call per request, no retries.
#[derive(Debug, Clone)]
pub struct CatalogGateway {
    client: Client,
    token: Option<String>,
    base_url: Url,
}

impl CatalogGateway {
    pub fn new(client: Client, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            token: config.tmdb_token().map(|t| t.to_string()),
            base_url: config.tmdb_base_url()?,
        })
    }

    pub fn ensure_configured(&self) -> Result<&str, GatewayError> {
        self.token.as_deref().ok_or(GatewayError::MissingCredential)
    }

    /// Provider URL for the request, fixed parameters included.
    pub fn target_url(&self, req: &CatalogRequest) -> Result<Url, GatewayError> {
        let path = req.path.trim().trim_start_matches('/');
        if path.is_empty() {
            return Err(GatewayError::MissingPath);
        }

        // Dot segments would let the route climb out of the base path.
        if path.split('/').any(|s| s == "." || s == "..") {
            return Err(GatewayError::InvalidPath(path.to_string()));
        }

        let encoded: Vec<String> = path
            .split('/')
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();

        let mut url = self
            .base_url
            .join(&encoded.join("/"))
            .map_err(|e| GatewayError::InvalidPath(e.to_string()))?;
        url.query_pairs_mut().extend_pairs(req.query_pairs());
        Ok(url)
    }

    /// Send the request and return the provider's body untouched.
    pub async fn forward(&self, req: &CatalogRequest) -> Result<Bytes, GatewayError> {
        let token = self.ensure_configured()?;
        let url = self.target_url(req)?;

        debug!("Forwarding catalog request to {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!(path = %req.path, "Movie catalog request failed: {}", e);
                GatewayError::Network(e)
            })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            error!(path = %req.path, status = status.as_u16(), "Movie catalog rejected request");
            let details = serde_json::from_slice(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        Ok(body)
    }
}

/// Successful gateway body as an HTTP response.
pub fn json_body(body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
