//! Mock chat endpoint
//!
//! Serves `POST /api/chat` on an ephemeral local port. Every request body is
//! recorded, and the reply is produced by a caller-supplied closure so tests
//! can vary the stream per model or per prompt.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// What the mock sends back for one request
pub enum MockReply {
    /// 200 with an NDJSON body
    Ndjson(String),
    /// Error status with a plain-text body
    Status(u16, &'static str),
}

type Handler = Arc<dyn Fn(&Value) -> MockReply + Send + Sync>;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Value>>>,
    handler: Handler,
}

pub struct MockChatServer {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockChatServer {
    /// Start the server on 127.0.0.1 with a random port
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Value) -> MockReply + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: requests.clone(),
            handler: Arc::new(handler),
        };
        let app = Router::new()
            .route("/api/chat", post(chat))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/api/chat", addr),
            requests,
        }
    }

    /// Request bodies received so far, in arrival order
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

async fn chat(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().unwrap().push(body.clone());
    match (state.handler)(&body) {
        MockReply::Ndjson(text) => {
            ([(header::CONTENT_TYPE, "application/x-ndjson")], text).into_response()
        }
        MockReply::Status(code, text) => (StatusCode::from_u16(code).unwrap(), text).into_response(),
    }
}

/// NDJSON body streaming `fragments`, then a `done` record, then a record
/// that must never be surfaced
pub fn ndjson(fragments: &[&str]) -> String {
    let mut body = String::new();
    for fragment in fragments {
        body.push_str(&json!({"message": {"role": "assistant", "content": fragment}, "done": false}).to_string());
        body.push('\n');
    }
    body.push_str(&json!({"message": {"role": "assistant", "content": ""}, "done": true}).to_string());
    body.push('\n');
    body.push_str(&json!({"message": {"role": "assistant", "content": "AFTER-DONE"}, "done": false}).to_string());
    body.push('\n');
    body
}

/// Endpoint that promises a 1000-byte body, sends one line of it, then closes
/// the connection
pub struct TruncatedBodyServer {
    pub url: String,
    connections: Arc<AtomicUsize>,
}

impl TruncatedBodyServer {
    pub async fn start(line: &'static str) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = connections.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    read_request(&mut socket).await;
                    let head = "HTTP/1.1 200 OK\r\n\
                                content-type: application/x-ndjson\r\n\
                                content-length: 1000\r\n\r\n";
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(line.as_bytes()).await;
                    let _ = socket.flush().await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            url: format!("http://{}/api/chat", addr),
            connections,
        }
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

/// Consume one full request so closing the socket does not reset it
async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + body_len {
            return;
        }
    }
}

/// URL on which nothing is listening
#[allow(dead_code)]
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/chat", addr)
}
