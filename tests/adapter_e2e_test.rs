use std::net::SocketAddr;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use tui_cluster::adapter::{run_server, ServerConfig};
use tui_cluster::core::{GameState, Rules};
use tui_cluster::engine::{Coordinator, CoordinatorHandle};
use tui_cluster::types::GameConfig;

async fn start(allow_remote_restart: bool, seed: u64) -> (SocketAddr, CoordinatorHandle) {
    let state = GameState::with_rules(
        Rules {
            width: 6,
            height: 5,
            kinds: 3,
            refill_budget: 20,
        },
        Some(seed),
    )
    .unwrap();
    let (handle, _join) = Coordinator::spawn(state).unwrap();

    let config = ServerConfig {
        addr: "127.0.0.1:0".parse().unwrap(),
        allow_remote_restart,
        static_dir: None,
        stream_interval: Duration::from_millis(1000),
        tiles: GameConfig::default().tile_types,
    };

    let (ready_tx, ready_rx) = oneshot::channel();
    let server_handle = handle.clone();
    tokio::spawn(async move {
        let _ = run_server(config, server_handle, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");
    (addr, handle)
}

/// One HTTP/1.1 exchange on a fresh connection. Returns the status code and body.
async fn exchange(addr: SocketAddr, method: &str, path: &str, body: Option<&str>) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.expect("connect failed");

    let mut request = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(body) = body {
        request.push_str("Content-Type: application/json\r\n");
        request.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));
    } else {
        request.push_str("\r\n");
    }
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = String::new();
    tokio::time::timeout(Duration::from_secs(2), stream.read_to_string(&mut raw))
        .await
        .expect("response timed out")
        .unwrap();

    let status = raw
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status line");
    let body = raw
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.to_string())
        .unwrap_or_default();
    (status, body)
}

fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("bad json {body:?}: {e}"))
}

#[tokio::test]
async fn board_over_http() {
    let (addr, _handle) = start(false, 42).await;

    let (status, body) = exchange(addr, "GET", "/api/board", None).await;
    assert_eq!(status, 200);
    let board = json(&body);
    assert_eq!(board["seed"], 42);
    assert_eq!(board["points"], 0);
    assert_eq!(board["board"]["width"], 6);
    assert_eq!(board["board"]["height"], 5);
    assert_eq!(board["board"]["tiles"].as_array().unwrap().len(), 5);
    assert!(board["gameOver"].is_boolean());
}

#[tokio::test]
async fn hit_over_http_matches_coordinator_view() {
    let (addr, handle) = start(false, 7).await;

    for y in 0..5 {
        for x in 0..6 {
            let payload = format!(r#"{{"x":{x},"y":{y}}}"#);
            let (status, body) = exchange(addr, "POST", "/api/board", Some(&payload)).await;
            assert_eq!(status, 200);
            let reply = json(&body);
            let snap = handle.snapshot().await.unwrap();
            assert_eq!(reply["points"], snap.points);
            assert_eq!(reply["gameOver"], snap.game_over);
        }
    }
}

#[tokio::test]
async fn malformed_requests_get_client_errors() {
    let (addr, handle) = start(false, 9).await;
    let before = handle.snapshot().await.unwrap();

    let (status, _) = exchange(addr, "POST", "/api/board", Some("{not json")).await;
    assert!((400..500).contains(&status), "status {status}");

    let (status, _) = exchange(addr, "POST", "/api/board", Some(r#"{"x":"one"}"#)).await;
    assert!((400..500).contains(&status), "status {status}");

    let (status, body) = exchange(addr, "POST", "/api/restart", None).await;
    assert_eq!(status, 403);
    assert!(json(&body)["error"].is_string());

    assert_eq!(handle.snapshot().await.unwrap(), before);
}

#[tokio::test]
async fn restart_over_http_when_enabled() {
    let (addr, _handle) = start(true, 1234).await;

    let (_, initial) = exchange(addr, "GET", "/api/board", None).await;
    for x in 0..6 {
        let payload = format!(r#"{{"x":{x},"y":4}}"#);
        exchange(addr, "POST", "/api/board", Some(&payload)).await;
    }

    let (status, body) = exchange(addr, "POST", "/api/restart", None).await;
    assert_eq!(status, 200);
    let restarted = json(&body);
    assert_eq!(restarted, json(&initial));

    let (status, body) = exchange(addr, "POST", "/api/new-game", None).await;
    assert_eq!(status, 200);
    assert_ne!(json(&body)["seed"], 1234);
}
