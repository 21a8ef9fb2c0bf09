// gate-server/src/chat.rs
use actix::{Actor, ActorContext, AsyncContext, StreamHandler};
use actix_web::{web, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use common::models::client::Client;
use common::ChatMessage;
use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::error::GateError;
use crate::session::AuthenticatedClient;

/// Max frame size for both directions of a chat socket
pub const WS_BUFFER_SIZE: usize = 1024 * 5;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat logic that runs on top of an upgraded connection
pub trait ChatHandler: Send + Sync + 'static {
    fn connected(&self, _client: &Client) {}

    /// Reply to an inbound text frame, if any
    fn message(&self, client: &Client, text: &str) -> Option<String>;

    fn disconnected(&self, _client: &Client) {}
}

/// Echoes every text frame back wrapped in a `ChatMessage` envelope
#[derive(Debug, Default)]
pub struct EchoChatHandler;

impl ChatHandler for EchoChatHandler {
    fn connected(&self, client: &Client) {
        tracing::info!("Chat opened for client: {}", client.pid);
    }

    fn message(&self, client: &Client, text: &str) -> Option<String> {
        match serde_json::to_string(&ChatMessage::new(client.pid.as_str(), text)) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!("Failed to serialize chat message: {}", e);
                None
            }
        }
    }

    fn disconnected(&self, client: &Client) {
        tracing::info!("Chat closed for client: {}", client.pid);
    }
}

/// Owns one upgraded connection for its whole life
pub struct ChatSessionActor {
    client: Client,
    handler: Arc<dyn ChatHandler>,
    last_heartbeat: Instant,
}

impl ChatSessionActor {
    pub fn new(client: Client, handler: Arc<dyn ChatHandler>) -> Self {
        Self {
            client,
            handler,
            last_heartbeat: Instant::now(),
        }
    }

    fn heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.last_heartbeat) > CLIENT_TIMEOUT {
                tracing::warn!("Chat heartbeat timeout: {}", act.client.pid);
                ctx.stop();
                return;
            }

            ctx.ping(b"");
        });
    }
}

impl Actor for ChatSessionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.last_heartbeat = Instant::now();
        self.heartbeat(ctx);
        self.handler.connected(&self.client);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.handler.disconnected(&self.client);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChatSessionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&msg);
            },
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            },
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                if let Some(reply) = self.handler.message(&self.client, &text) {
                    ctx.text(reply);
                }
            },
            Ok(ws::Message::Binary(bin)) => {
                self.last_heartbeat = Instant::now();
                tracing::debug!("Ignoring {} byte binary frame from {}", bin.len(), self.client.pid);
            },
            Ok(ws::Message::Close(reason)) => {
                tracing::info!("Client closing chat: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            },
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => (),
            Err(e) => {
                tracing::error!("WebSocket protocol error from {}: {}", self.client.pid, e);
                ctx.stop();
            }
        }
    }
}

/// Upgrade a session-authenticated request and hand the socket to a new
/// `ChatSessionActor`. The actor runs detached; this handler keeps nothing.
pub async fn chat_ws(
    req: HttpRequest,
    stream: web::Payload,
    client: AuthenticatedClient,
    handler: web::Data<dyn ChatHandler>,
) -> Result<HttpResponse, GateError> {
    let session = ChatSessionActor::new(client.into_inner(), handler.into_inner());

    ws::WsResponseBuilder::new(session, &req, stream)
        .frame_size(WS_BUFFER_SIZE)
        .start()
        .map_err(|e| {
            tracing::warn!("WebSocket upgrade failed: {}", e);
            GateError::UpgradeFailed
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_wraps_in_envelope() {
        let client = Client::provisioned("alice", "secret1", "default@localhost");
        let reply = EchoChatHandler.message(&client, "hello").unwrap();
        let envelope: ChatMessage = serde_json::from_str(&reply).unwrap();
        assert_eq!(envelope.pid, "alice");
        assert_eq!(envelope.content, "hello");
    }
}
