//! Integration tests for the streaming chat client
//!
//! These run the client against a local mock of the `/api/chat` endpoint.

#[path = "common/server.rs"]
mod server;

use cogbench::config::EndpointConfig;
use cogbench::{ChatClient, HarnessError};
use futures::{StreamExt, TryStreamExt};
use server::{ndjson, unreachable_url, MockChatServer, MockReply, TruncatedBodyServer};

fn endpoint(url: &str) -> EndpointConfig {
    EndpointConfig {
        url: url.to_string(),
        timeout_secs: 30,
    }
}

#[tokio::test]
async fn test_request_body_shape() {
    let server = MockChatServer::start(|_| MockReply::Ndjson(ndjson(&["ok"]))).await;
    let client = ChatClient::new(&endpoint(&server.url)).unwrap();

    let _: Vec<String> = client
        .stream_chat("gemma3:27b", "Run the program")
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        serde_json::json!({
            "model": "gemma3:27b",
            "messages": [{"role": "user", "content": "Run the program"}],
            "stream": true
        })
    );
}

#[tokio::test]
async fn test_fragments_stop_at_done() {
    let server =
        MockChatServer::start(|_| MockReply::Ndjson(ndjson(&["10 ", "PRINT ", "\"hi\""]))).await;
    let client = ChatClient::new(&endpoint(&server.url)).unwrap();

    let fragments: Vec<String> = client
        .stream_chat("mistral:7b", "prompt")
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(fragments, vec!["10 ", "PRINT ", "\"hi\""]);
    assert!(!fragments.iter().any(|f| f == "AFTER-DONE"));
}

#[tokio::test]
async fn test_garbage_lines_do_not_interrupt_stream() {
    let body = "{\"message\":{\"content\":\"a\"}}\n\
                : keep-alive\n\
                {\"message\":{\"content\":\n\
                {\"message\":{\"content\":\"b\"},\"done\":true}\n";
    let server = MockChatServer::start(move |_| MockReply::Ndjson(body.to_string())).await;
    let client = ChatClient::new(&endpoint(&server.url)).unwrap();

    let fragments: Vec<String> = client
        .stream_chat("m", "p")
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(fragments, vec!["a", "b"]);
}

#[tokio::test]
async fn test_each_call_opens_a_new_stream() {
    let server = MockChatServer::start(|_| MockReply::Ndjson(ndjson(&["x"]))).await;
    let client = ChatClient::new(&endpoint(&server.url)).unwrap();

    for _ in 0..2 {
        let mut stream = client.stream_chat("m", "p").await.unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), "x");
        assert!(stream.next().await.is_none());
        // A finished stream stays finished
        assert!(stream.next().await.is_none());
    }

    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_error_status_is_transport_failure() {
    let server = MockChatServer::start(|_| MockReply::Status(404, "model 'nope' not found")).await;
    let client = ChatClient::new(&endpoint(&server.url)).unwrap();

    let err = match client.stream_chat("nope", "p").await {
        Ok(_) => panic!("expected an error status"),
        Err(e) => e,
    };

    assert!(err.is_transport());
    match err {
        HarnessError::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("Expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_failure() {
    let url = unreachable_url().await;
    let client = ChatClient::new(&endpoint(&url)).unwrap();

    let err = match client.stream_chat("m", "p").await {
        Ok(_) => panic!("expected a connection error"),
        Err(e) => e,
    };

    assert!(matches!(err, HarnessError::Transport(_)));
}

#[tokio::test]
async fn test_read_error_mid_body_ends_stream() {
    let server =
        TruncatedBodyServer::start("{\"message\":{\"content\":\"a\"},\"done\":false}\n").await;
    let client = ChatClient::new(&endpoint(&server.url)).unwrap();

    let mut stream = client.stream_chat("m", "p").await.unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), "a");
    match stream.next().await {
        Some(Err(HarnessError::Transport(_))) => {}
        other => panic!("Expected a transport error, got {:?}", other),
    }
    assert!(stream.next().await.is_none());
    assert_eq!(server.connections(), 1);
}
