//! Local stand-in for the assistant API.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
};
use mintlify_mcp::assistant::{AssistantClient, AssistantSettings, ProjectRegistry};
use mintlify_mcp::bridge::DocsBridge;

/// A request as received by the mock upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub project: String,
    pub origin: Option<String>,
    pub referer: Option<String>,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

impl Captured {
    pub fn messages(&self) -> &Vec<serde_json::Value> {
        self.body["messages"].as_array().expect("messages array")
    }
}

#[derive(Clone)]
pub struct MockUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
    failure: Arc<Mutex<Option<StatusCode>>>,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Captured>>>,
    failure: Arc<Mutex<Option<StatusCode>>>,
}

impl MockUpstream {
    /// Start a mock upstream on an ephemeral port.
    ///
    /// Each request is answered with `Answer: <last question>`, split over
    /// two text chunks and surrounded by metadata lines.
    pub async fn start() -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let failure = Arc::new(Mutex::new(None));
        let state = MockState {
            requests: Arc::clone(&requests),
            failure: Arc::clone(&failure),
        };

        let app = Router::new()
            .route("/api/assistant/{project}/message", post(message))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            failure,
        }
    }

    /// Answer every following request with `status`.
    pub fn fail_with(&self, status: StatusCode) {
        *self.failure.lock().unwrap() = Some(status);
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Captured {
        self.requests().pop().expect("no request received")
    }

    pub fn client(&self) -> AssistantClient {
        let settings = AssistantSettings {
            base_url: self.base_url.clone(),
            timeout: Some(Duration::from_secs(5)),
        };
        AssistantClient::new(&settings, ProjectRegistry::builtin()).unwrap()
    }

    pub fn bridge(&self) -> DocsBridge {
        DocsBridge::new(self.client())
    }
}

async fn message(
    State(state): State<MockState>,
    Path(project): Path<String>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    let question = body["messages"]
        .as_array()
        .and_then(|m| m.last())
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default()
        .to_string();

    state.requests.lock().unwrap().push(Captured {
        project,
        origin: header("origin"),
        referer: header("referer"),
        content_type: header("content-type"),
        body,
    });

    if let Some(status) = *state.failure.lock().unwrap() {
        return (status, "upstream unavailable".to_string());
    }

    // Give concurrent callers a chance to overlap.
    tokio::time::sleep(Duration::from_millis(10)).await;

    let chunk = |text: &str| serde_json::to_string(text).unwrap();
    let reply = format!(
        "f:{{\"messageId\":\"msg-1\"}}\n\
         0:{}\n\
         a:{{\"toolCallId\":\"call-1\",\"result\":[{{\"title\":\"Search hit\"}}]}}\n\
         0:{}\n\
         e:{{\"finishReason\":\"stop\"}}\n\
         d:{{\"finishReason\":\"stop\"}}\n",
        chunk("Answer: "),
        chunk(&question),
    );
    (StatusCode::OK, reply)
}
