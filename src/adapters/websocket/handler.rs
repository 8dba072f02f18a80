//! WebSocket upgrade handler for moderator connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Authenticate the handshake through the connection gate
//! 2. Upgrade to WebSocket (only after the gate passes)
//! 3. Attach the moderator session
//! 4. Apply each command frame in arrival order until disconnect
//! 5. Detach the session's connection handle

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::application::{ConnectionGate, Dispatch, EventRouter, Handshake, ModeratorContext};
use crate::domain::foundation::{AuthError, AuthenticatedModerator, ErrorCode};

use super::messages::{ClientMessage, ServerMessage};

/// State shared by every moderator connection.
#[derive(Clone)]
pub struct ModeratorSocketState {
    pub gate: Arc<ConnectionGate>,
    pub router: Arc<EventRouter>,
}

impl ModeratorSocketState {
    pub fn new(gate: Arc<ConnectionGate>, router: Arc<EventRouter>) -> Self {
        Self { gate, router }
    }
}

/// Handle WebSocket upgrade requests for the moderator channel.
///
/// Route: `GET /admin?username=<u>&password=<p>`
///
/// A rejected handshake gets `401 invalid credentials` and no socket.
pub async fn admin_ws_handler(
    ws: WebSocketUpgrade,
    Query(handshake): Query<Handshake>,
    State(state): State<ModeratorSocketState>,
) -> Response {
    match state.gate.authorize(handshake).await {
        Ok(moderator) => ws.on_upgrade(move |socket| handle_socket(socket, moderator, state)),
        Err(e @ AuthError::InvalidCredentials) => {
            (StatusCode::UNAUTHORIZED, e.to_string()).into_response()
        }
        Err(AuthError::ServiceUnavailable(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "service unavailable").into_response()
        }
    }
}

/// Handle an established moderator connection.
///
/// Each frame's registry effects are applied on this loop, in arrival
/// order. Only the persistence a command waits on is spawned, so storage
/// never holds up the next frame. Replies are funnelled through one writer
/// task.
async fn handle_socket(socket: WebSocket, moderator: AuthenticatedModerator, state: ModeratorSocketState) {
    let ctx = Arc::new(state.router.attach(moderator));
    let (sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<ServerMessage>();

    tokio::spawn(write_loop(sink, rx, ctx.clone()));
    let _ = tx.send(ServerMessage::connected(&ctx));

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(envelope) => match state.router.begin(&ctx, envelope) {
                    Some(Dispatch::Ready(ack)) => {
                        let _ = tx.send(ack.into());
                    }
                    Some(Dispatch::Pending(pending)) => {
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let _ = tx.send(pending.await.into());
                        });
                    }
                    None => {}
                },
                Err(e) => {
                    debug!(moderator = %ctx.username(), "Unreadable frame: {}", e);
                    let _ = tx.send(ServerMessage::error(
                        ErrorCode::InvalidFormat,
                        "frame is not a command envelope",
                    ));
                }
            },
            Ok(Message::Binary(_)) => {
                debug!(moderator = %ctx.username(), "Received unsupported binary message");
                let _ = tx.send(ServerMessage::error(
                    ErrorCode::InvalidFormat,
                    "binary frames are not supported",
                ));
            }
            Ok(Message::Close(_)) => {
                debug!(moderator = %ctx.username(), "Client sent close frame");
                break;
            }
            // Protocol ping/pong is answered by axum.
            Ok(_) => {}
            Err(e) => {
                debug!(moderator = %ctx.username(), "Receive error: {}", e);
                break;
            }
        }
    }

    state.router.detach(&ctx);
}

/// Forward queued messages to the socket until every sender is gone or the
/// socket fails.
async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    ctx: Arc<ModeratorContext>,
) {
    while let Some(msg) = rx.recv().await {
        if let Err(e) = send_message(&mut sink, &msg).await {
            debug!(moderator = %ctx.username(), "Send error, closing connection: {}", e);
            break;
        }
    }
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sink: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(|e| {
        warn!("Failed to serialize server message: {}", e);
        axum::Error::new(e)
    })?;
    sink.send(Message::Text(json)).await
}

/// Router for the moderator endpoint, before state is attached.
pub fn moderator_router() -> Router<ModeratorSocketState> {
    Router::new().route("/admin", get(admin_ws_handler))
}

/// The complete moderator HTTP app with request tracing.
pub fn moderator_app(state: ModeratorSocketState) -> Router {
    moderator_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
