pub mod catalog;
pub mod config;
pub mod intent;
pub mod middleware;
pub mod server;
pub mod util;

#[cfg(test)]
mod testutil;

use std::net::SocketAddr;
use tracing::info;

use crate::catalog::{CatalogRequest, GatewayError, MovieList};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] GatewayError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Load the config file (if any) and apply environment overrides.
pub fn load_config(config_path: Option<&str>, debug_logs: bool) -> Result<config::Config, ServerError> {
    let mut config = match config_path {
        Some(path) => {
            info!("Using config file: {}", path);
            config::Config::from_file(path)?
        }
        None => config::Config::default(),
    };
    config.apply_env();
    config.debug_logs = debug_logs;
    Ok(config)
}

pub async fn run(config: config::Config) -> Result<(), ServerError> {
    if config.debug_logs {
        info!("Debug logging enabled");
    }
    if config.tmdb_token().is_none() {
        info!("No TMDB API key set, catalog requests will be refused");
    }

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = server::AppState::new(config)?;
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}

/// One-shot search from the command line. Returns the movies found.
pub async fn search_once(config: config::Config, text: &str) -> Result<MovieList, ServerError> {
    let state = server::AppState::new(config)?;

    let intent = state
        .intent
        .parse(text.trim())
        .await
        .unwrap_or_else(|never| match never {});
    info!(path = %intent.path, params = ?intent.params, "Search intent");

    let body = state
        .catalog
        .forward(&CatalogRequest::from_intent(&intent))
        .await?;

    serde_json::from_slice(&body)
        .map_err(|e| ServerError::Server(format!("Unexpected catalog response: {}", e)))
}
