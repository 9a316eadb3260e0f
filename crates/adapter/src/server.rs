//! HTTP + WebSocket server
//!
//! Every route turns into exactly one coordinator request. Malformed input
//! is answered here and never reaches the coordinator.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use tui_cluster_engine::{Command, CoordinatorError, CoordinatorHandle};
use tui_cluster_types::{ConfigError, GameConfig, TileType, STREAM_INTERVAL_MS};

use crate::protocol::{BoardReply, ClientMessage, ErrorReply, HitRequest};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub allow_remote_restart: bool,
    pub static_dir: Option<PathBuf>,
    /// Idle period after which a WebSocket client gets an unsolicited board.
    pub stream_interval: Duration,
    pub tiles: Vec<TileType>,
}

impl ServerConfig {
    pub fn from_game_config(config: &GameConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            addr: config.socket_addr()?,
            allow_remote_restart: config.allow_remote_restart,
            static_dir: config.static_dir.as_ref().map(PathBuf::from),
            stream_interval: Duration::from_millis(STREAM_INTERVAL_MS),
            tiles: config.tile_types.clone(),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    handle: CoordinatorHandle,
    tiles: Arc<[TileType]>,
    allow_remote_restart: bool,
    stream_interval: Duration,
}

impl AppState {
    async fn reply(&self, command: Command) -> Result<BoardReply, CoordinatorError> {
        let snapshot = self.handle.request(command).await?;
        Ok(BoardReply::from_snapshot(&snapshot, &self.tiles))
    }
}

/// Error half of every handler: a status plus an [`ErrorReply`] body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<CoordinatorError> for ApiError {
    fn from(err: CoordinatorError) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorReply::new(self.message))).into_response()
    }
}

type ApiResult = Result<Json<BoardReply>, ApiError>;

async fn health() -> &'static str {
    "ok"
}

async fn get_board(State(state): State<AppState>) -> ApiResult {
    Ok(Json(state.reply(Command::Get).await?))
}

async fn post_board(
    State(state): State<AppState>,
    payload: Result<Json<HitRequest>, JsonRejection>,
) -> ApiResult {
    let Json(HitRequest { x, y }) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected hit request");
        ApiError::new(rejection.status(), rejection.body_text())
    })?;
    Ok(Json(state.reply(Command::Hit { x, y }).await?))
}

async fn restart(State(state): State<AppState>) -> ApiResult {
    if !state.allow_remote_restart {
        return Err(ApiError::new(StatusCode::FORBIDDEN, "restart is disabled"));
    }
    Ok(Json(state.reply(Command::Restart).await?))
}

async fn new_game(State(state): State<AppState>) -> ApiResult {
    if !state.allow_remote_restart {
        return Err(ApiError::new(StatusCode::FORBIDDEN, "newGame is disabled"));
    }
    Ok(Json(state.reply(Command::NewGame).await?))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| ws_session(socket, state))
}

fn frame<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

/// What a streaming session sends back for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outgoing {
    Frame(String),
    /// Final frame; the session ends after sending it.
    Last(String),
}

impl AppState {
    /// Answer one client text frame. Malformed frames get an error frame and
    /// never reach the coordinator.
    async fn answer_text(&self, text: &str) -> Outgoing {
        match ClientMessage::parse(text).and_then(|m| m.to_command(self.allow_remote_restart)) {
            Ok(command) => self.answer(command).await,
            Err(e) => {
                debug!(error = %e, "rejected websocket frame");
                Outgoing::Frame(frame(&ErrorReply::new(e)))
            }
        }
    }

    async fn answer(&self, command: Command) -> Outgoing {
        match self.reply(command).await {
            Ok(reply) => Outgoing::Frame(frame(&reply)),
            Err(e) => Outgoing::Last(frame(&ErrorReply::new(e))),
        }
    }
}

/// Serve one WebSocket client until it leaves or the coordinator is gone.
///
/// Each round waits for either a client frame or the stream interval,
/// whichever comes first, and answers with exactly one frame.
async fn ws_session(mut socket: WebSocket, state: AppState) {
    info!("websocket client connected");

    loop {
        let outgoing = tokio::select! {
            _ = tokio::time::sleep(state.stream_interval) => state.answer(Command::Get).await,
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => state.answer_text(&text).await,
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    debug!(error = %e, "websocket receive failed");
                    break;
                }
            }
        };

        let (text, last) = match outgoing {
            Outgoing::Frame(text) => (text, false),
            Outgoing::Last(text) => (text, true),
        };
        if socket.send(Message::Text(text)).await.is_err() || last {
            break;
        }
    }

    info!("websocket client disconnected");
}

/// Build the application router.
pub fn router(config: &ServerConfig, handle: CoordinatorHandle) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        handle,
        tiles: config.tiles.clone().into(),
        allow_remote_restart: config.allow_remote_restart,
        stream_interval: config.stream_interval,
    };

    let mut app = Router::new()
        .route("/api/health", get(health))
        .route("/api/board", get(get_board).post(post_board))
        .route("/api/restart", post(restart))
        .route("/api/new-game", post(new_game))
        .route("/ws", get(ws_handler));

    if let Some(dir) = &config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.with_state(state).layer(cors)
}

/// Serve `app` on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}

/// Bind `config.addr` and serve until the task is dropped.
///
/// `ready_tx` receives the actual bound address (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    handle: CoordinatorHandle,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "server listening");

    if let Some(tx) = ready_tx {
        let _ = tx.send(local_addr);
    }

    serve(listener, router(&config, handle)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tui_cluster_core::{GameState, Rules};
    use tui_cluster_engine::Coordinator;

    fn config(allow_remote_restart: bool) -> ServerConfig {
        ServerConfig {
            addr: "127.0.0.1:0".parse().unwrap(),
            allow_remote_restart,
            static_dir: None,
            stream_interval: Duration::from_millis(STREAM_INTERVAL_MS),
            tiles: GameConfig::default().tile_types,
        }
    }

    fn handle() -> CoordinatorHandle {
        let state = GameState::with_rules(
            Rules {
                width: 5,
                height: 4,
                kinds: 3,
                refill_budget: 10,
            },
            Some(42),
        )
        .unwrap();
        let (handle, _join) = Coordinator::spawn(state).unwrap();
        handle
    }

    fn app(allow_remote_restart: bool) -> Router {
        router(&config(allow_remote_restart), handle())
    }

    fn app_state(allow_remote_restart: bool) -> AppState {
        AppState {
            handle: handle(),
            tiles: GameConfig::default().tile_types.into(),
            allow_remote_restart,
            stream_interval: Duration::from_millis(STREAM_INTERVAL_MS),
        }
    }

    fn frame_json(outgoing: Outgoing) -> serde_json::Value {
        match outgoing {
            Outgoing::Frame(text) => serde_json::from_str(&text).unwrap(),
            Outgoing::Last(text) => panic!("unexpected final frame: {text}"),
        }
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let resp = app(true)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_board_returns_full_grid() {
        let resp = app(true)
            .oneshot(Request::get("/api/board").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["board"]["width"], 5);
        assert_eq!(json["board"]["height"], 4);
        assert_eq!(json["board"]["tiles"].as_array().unwrap().len(), 4);
        assert_eq!(json["points"], 0);
        assert_eq!(json["seed"], 42);
    }

    #[tokio::test]
    async fn any_origin_is_allowed() {
        let resp = app(true)
            .oneshot(
                Request::get("/api/board")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn post_board_applies_hit() {
        let resp = app(true)
            .oneshot(
                Request::post("/api/board")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"x":99,"y":99}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["points"], 0);
    }

    #[tokio::test]
    async fn malformed_hit_is_a_client_error() {
        let resp = app(true)
            .oneshot(
                Request::post("/api/board")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"x":"left"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
        let json = body_json(resp).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn restart_can_be_disabled() {
        let resp = app(false)
            .oneshot(Request::post("/api/restart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = app(false)
            .oneshot(Request::post("/api/new-game").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn restart_keeps_seed() {
        let resp = app(true)
            .oneshot(Request::post("/api/restart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["seed"], 42);
    }

    #[tokio::test]
    async fn websocket_frames_map_to_commands() {
        let state = app_state(true);

        let json = frame_json(state.answer_text(r#"{"x":0,"y":0}"#).await);
        assert_eq!(json["board"]["width"], 5);

        let json = frame_json(state.answer_text(r#"{"action":"get"}"#).await);
        assert_eq!(json["seed"], 42);

        let json = frame_json(state.answer_text(r#"{"action":"restart"}"#).await);
        assert_eq!(json["points"], 0);
    }

    #[tokio::test]
    async fn malformed_websocket_frames_get_error_frames() {
        let state = app_state(false);

        for text in ["{oops", r#"{"action":"fly"}"#, r#"{"x":1}"#, r#"{"action":"newGame"}"#] {
            let json = frame_json(state.answer_text(text).await);
            assert!(json["error"].is_string(), "no error for {text}");
            assert!(json.get("board").is_none());
        }

        // The session keeps working after an error.
        let json = frame_json(state.answer(Command::Get).await);
        assert_eq!(json["board"]["height"], 4);
    }
}
