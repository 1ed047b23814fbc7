//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use chat_bridge::correlation::CorrelationTable;
use chat_bridge::{BridgeConfig, HttpServer, Shutdown};

/// Start a mock conversational backend.
///
/// For every inbound text frame, `reply` decides which frames (if any) to
/// send back. Returns the bound address.
pub async fn start_mock_backend<F>(reply: F) -> SocketAddr
where
    F: Fn(serde_json::Value) -> Vec<String> + Clone + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let reply = reply.clone();
            tokio::spawn(async move {
                let Ok(mut ws) = accept_async(socket).await else {
                    return;
                };
                while let Some(Ok(message)) = ws.next().await {
                    if let Message::Text(text) = message {
                        let Ok(value) = serde_json::from_str::<serde_json::Value>(text.as_str())
                        else {
                            continue;
                        };
                        for frame in reply(value) {
                            if ws.send(Message::Text(frame.into())).await.is_err() {
                                return;
                            }
                        }
                    }
                }
            });
        }
    });

    addr
}

/// Start a mock backend that accepts the handshake and then immediately
/// drops the connection.
#[allow(dead_code)]
pub async fn start_vanishing_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            if let Ok(ws) = accept_async(socket).await {
                drop(ws);
            }
        }
    });

    addr
}

/// Start a mock backend that reads one frame and then hangs up without
/// replying.
#[allow(dead_code)]
pub async fn start_hangup_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let Ok(mut ws) = accept_async(socket).await else {
                    return;
                };
                let _ = ws.next().await;
            });
        }
    });

    addr
}

/// Bridge configuration pointed at a mock backend, with test-friendly waits.
pub fn config_for(backend: SocketAddr) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.backend.host = backend.ip().to_string();
    config.backend.port = backend.port();
    config.timeouts.connect_secs = 5;
    config.timeouts.reply_secs = 5;
    config.timeouts.request_secs = 10;
    config
}

/// Start the bridge on an ephemeral port.
///
/// Returns the HTTP address, a table handle for post-exchange probes, and
/// the shutdown coordinator keeping the server alive.
pub async fn start_bridge(config: BridgeConfig) -> (SocketAddr, Arc<CorrelationTable>, Arc<Shutdown>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::connect(config).await.unwrap();
    let table = server.table();

    let shutdown = Arc::new(Shutdown::new());
    let held = shutdown.clone();
    tokio::spawn(async move {
        server.run(listener, held.as_ref()).await.unwrap();
    });

    (addr, table, shutdown)
}

/// A chat reply frame for `user_id`.
#[allow(dead_code)]
pub fn chat_frame(user_id: &str, content: &str) -> String {
    serde_json::json!({ "user_id": user_id, "type": "chat", "content": content }).to_string()
}
