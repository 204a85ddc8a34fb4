use axum::{extract::Request, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

use crate::catalog::CatalogGateway;
use crate::config::{Config, ConfigError};
use crate::intent::{GeminiClient, IntentModel, IntentParser};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<CatalogGateway>,
    pub intent: IntentParser,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let client = reqwest::Client::new();

        let model: Option<Arc<dyn IntentModel>> = match config.gemini_key() {
            Some(key) => {
                info!("Using Gemini model {} for search intent", config.gemini.model);
                Some(Arc::new(GeminiClient::new(client.clone(), key, &config.gemini)))
            }
            None => {
                info!("No Gemini API key set, search intent uses keyword rules");
                None
            }
        };

        Self::with_parts(config, client, IntentParser::new(model))
    }

    pub fn with_parts(
        config: Config,
        client: reqwest::Client,
        intent: IntentParser,
    ) -> Result<Self, ConfigError> {
        let catalog = CatalogGateway::new(client, &config)?;
        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            intent,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/movies", get(crate::catalog::list_movies))
        .route("/api/search", get(crate::catalog::search_movies))
        .route("/api/search-intent", get(crate::intent::parse_search));

    let mut router = Router::new()
        .route("/robots.txt", get(robots_txt_handler))
        .merge(api_routes)
        .fallback(fallback_handler);

    if let Some(ref appdir) = state.config.appdir {
        router = router.fallback_service(ServeDir::new(appdir));
    }

    let router = router
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(CatchPanicLayer::custom(crate::middleware::panic_response))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Layers on a router run after route matching, so the path rewrite wraps
    // the whole router to take effect before it.
    Router::new()
        .fallback_service(router)
        .layer(axum::middleware::from_fn(crate::middleware::normalize_path))
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    // CORS preflight
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
