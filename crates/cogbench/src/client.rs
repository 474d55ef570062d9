//! Streaming chat client
//!
//! Talks to an Ollama-style `/api/chat` endpoint in streaming mode. The
//! response body is newline-delimited JSON; each record may carry a
//! `message.content` fragment and/or a `done` flag:
//!
//! ```text
//! {"message":{"role":"assistant","content":"Step"},"done":false}
//! {"message":{"role":"assistant","content":" 1"},"done":false}
//! {"done":true,"total_duration":123456}
//! ```
//!
//! [`ChatClient::stream_chat`] returns a lazy [`ChatStream`] of text
//! fragments. Nothing is read from the socket until the stream is polled, and
//! each fragment is available as soon as its line has arrived.

use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use tracing::{debug, instrument, trace, warn};

use crate::config::EndpointConfig;
use crate::error::{HarnessError, Result};

/// Lazy, single-pass sequence of response fragments
pub type ChatStream = BoxStream<'static, Result<String>>;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// One decoded line of the streaming response
#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    /// Any JSON value; only a truthy one ends the stream
    #[serde(default)]
    done: Option<Value>,
}

impl ChatChunk {
    fn is_done(&self) -> bool {
        match &self.done {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the streaming chat endpoint
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    url: String,
}

impl ChatClient {
    /// Build a client for the configured endpoint
    ///
    /// The timeout covers the whole request including the streamed body, so
    /// it has to be long enough for a full generation.
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(endpoint.timeout())
            .build()?;
        Ok(Self {
            http,
            url: endpoint.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send `prompt` to `model` and stream the reply
    ///
    /// Fails with a transport error if the endpoint cannot be reached or
    /// answers with a non-success status. Requests are never retried.
    #[instrument(skip(self, prompt), fields(url = %self.url, prompt_len = prompt.len()))]
    pub async fn stream_chat(&self, model: &str, prompt: &str) -> Result<ChatStream> {
        let body = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: true,
        };

        let response = self.http.post(&self.url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Chat endpoint returned status {}: {}", status, body);
            return Err(HarnessError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Streaming response from {}", self.url);
        Ok(decode_chat_stream(Box::pin(response.bytes_stream()))
            .fuse()
            .boxed())
    }
}

struct DecodeState<S> {
    bytes: S,
    buffer: Vec<u8>,
    pending: VecDeque<String>,
    finished: bool,
}

impl<S> DecodeState<S> {
    /// Decode every complete line currently buffered
    fn drain_lines(&mut self) {
        while !self.finished {
            let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') else {
                break;
            };
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.handle_line(&line);
        }
    }

    /// Decode whatever is left once the body has ended
    fn drain_tail(&mut self) {
        self.drain_lines();
        if !self.finished && !self.buffer.is_empty() {
            let tail = std::mem::take(&mut self.buffer);
            self.handle_line(&tail);
        }
        self.finished = true;
    }

    fn handle_line(&mut self, line: &[u8]) {
        let line = line.trim_ascii();
        if line.is_empty() {
            return;
        }

        let chunk: ChatChunk = match serde_json::from_slice(line) {
            Ok(chunk) => chunk,
            Err(e) => {
                trace!("Skipping undecodable stream line: {}", e);
                return;
            }
        };

        let done = chunk.is_done();
        if let Some(content) = chunk.message.and_then(|m| m.content) {
            if !content.is_empty() {
                self.pending.push_back(content);
            }
        }

        if done {
            self.finished = true;
            self.buffer.clear();
        }
    }
}

/// Turn a raw response body into a stream of content fragments
///
/// Decoding stops at the first record with a truthy `done`; anything after it is
/// never read. Lines that are not valid JSON are skipped. A read error is
/// yielded once as [`HarnessError::Transport`] and ends the stream.
pub fn decode_chat_stream<S>(bytes: S) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin,
{
    let state = DecodeState {
        bytes,
        buffer: Vec::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.pending.pop_front() {
                return Some((Ok(fragment), state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    state.buffer.extend_from_slice(&chunk);
                    state.drain_lines();
                }
                Some(Err(e)) => {
                    warn!("Chat stream read failed: {}", e);
                    state.finished = true;
                    return Some((Err(HarnessError::Transport(e)), state));
                }
                None => state.drain_tail(),
            }
        }
    })
}
