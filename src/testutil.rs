//! In-process stand-in for the movie catalog provider and the Gemini API.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Clone)]
struct ProviderState {
    status: StatusCode,
    body: Value,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

pub struct FakeProvider {
    addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeProvider {
    /// Serve `body` with `status` for every request until the test ends.
    pub async fn start(status: u16, body: Value) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = ProviderState {
            status: StatusCode::from_u16(status).unwrap(),
            body,
            calls: calls.clone(),
        };
        let app = Router::new().fallback(respond).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, calls }
    }

    /// Root address of the server, without a trailing slash.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Catalog base address, shaped like the real provider's.
    pub fn base_url(&self) -> String {
        format!("{}/3/", self.url())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn respond(State(state): State<ProviderState>, req: Request) -> Response {
    let header_value = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    let call = RecordedCall {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().unwrap_or_default().to_string(),
        authorization: header_value(header::AUTHORIZATION.as_str()),
        accept: header_value(header::ACCEPT.as_str()),
        api_key: header_value("x-goog-api-key"),
    };
    state.calls.lock().unwrap().push(call);

    (state.status, Json(state.body.clone())).into_response()
}
