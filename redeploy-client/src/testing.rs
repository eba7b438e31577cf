//! Local HTTP stand-in for the orchestration endpoint
//!
//! Serves every operation at `POST /`, records the requests it receives and
//! answers through a closure keyed on the `X-Amz-Target` operation name.

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::OrchestratorClient;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub operation: String,
    pub content_type: Option<String>,
    pub body: Value,
}

type Responder = Arc<dyn Fn(&str, &Value) -> (StatusCode, Value) + Send + Sync>;

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
}

pub struct StubServer {
    url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    pub async fn start(
        responder: impl Fn(&str, &Value) -> (StatusCode, Value) + Send + Sync + 'static,
    ) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            requests: Arc::clone(&requests),
            responder: Arc::new(responder),
        };
        let app = Router::new().route("/", post(handle)).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn client(&self) -> OrchestratorClient {
        OrchestratorClient::new(self.url.clone())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Successful reply carrying `body`
pub fn ok(body: Value) -> (StatusCode, Value) {
    (StatusCode::OK, body)
}

async fn handle(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let operation = headers
        .get("x-amz-target")
        .and_then(|value| value.to_str().ok())
        .and_then(|target| target.rsplit('.').next())
        .unwrap_or_default()
        .to_string();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    let (status, reply) = (state.responder)(&operation, &body);
    state.requests.lock().unwrap().push(Recorded {
        operation,
        content_type,
        body,
    });

    (status, reply.to_string())
}
