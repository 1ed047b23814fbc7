//! Websocket session to the conversational backend.
//!
//! # Responsibilities
//! - Open one websocket connection, bounded by the connect timeout
//! - Serialize and write outbound messages
//! - Run the receive loop that turns inbound frames into targeted wakeups
//! - Observe open/error/close transitions
//!
//! # Design Decisions
//! - One long-lived session shared across requests, multiplexed by user id;
//!   the correlation table is the sole demultiplexer
//! - Writes go through an mpsc channel to a dedicated writer task, so `send`
//!   never contends on the sink
//! - A dead session fails pending exchanges instead of leaving them blocked
//! - No automatic reconnection: once the session is down, sends fail until
//!   the process is restarted

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::backend::protocol::{InboundFrame, OutboundFrame};
use crate::backend::types::{BridgeError, BridgeResult};
use crate::config::schema::BackendConfig;
use crate::correlation::CorrelationTable;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Capacity of the outbound write queue.
const OUTBOUND_QUEUE: usize = 64;

/// One live duplex connection to the backend.
#[derive(Debug)]
pub struct BackendSession {
    outbound: mpsc::Sender<Message>,
    open: Arc<AtomicBool>,
}

impl BackendSession {
    /// Open a connection and start the reader and writer tasks.
    ///
    /// Blocks until the websocket handshake completes, or fails with
    /// [`BridgeError::ConnectTimeout`] / [`BridgeError::Connection`] after a
    /// bounded wait.
    pub async fn connect(
        config: &BackendConfig,
        connect_timeout: Duration,
        table: Arc<CorrelationTable>,
    ) -> BridgeResult<Self> {
        let url = config.ws_url()?;

        let (stream, _response) = timeout(connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| BridgeError::ConnectTimeout(connect_timeout.as_secs()))?
            .map_err(|e| BridgeError::Connection(e.to_string()))?;

        tracing::info!(url = %url, "backend connection opened");

        let (sink, source) = stream.split();
        let (outbound, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE);
        let open = Arc::new(AtomicBool::new(true));

        tokio::spawn(write_loop(sink, outbound_rx, open.clone()));
        tokio::spawn(read_loop(source, table, open.clone()));

        Ok(Self { outbound, open })
    }

    /// Serialize and queue one outbound message.
    pub async fn send(&self, frame: &OutboundFrame) -> BridgeResult<()> {
        if !self.is_open() {
            return Err(BridgeError::Send("session is not open".to_string()));
        }
        let text = serde_json::to_string(frame).map_err(|e| BridgeError::Send(e.to_string()))?;
        self.outbound
            .send(Message::Text(text.into()))
            .await
            .map_err(|_| BridgeError::Send("session writer has shut down".to_string()))
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Queue a Close frame and stop accepting sends. The reader task observes
    /// the peer's close reply and tears the session down.
    pub async fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        let _ = self.outbound.send(Message::Close(None)).await;
    }
}

async fn write_loop(
    mut sink: SplitSink<WsStream, Message>,
    mut outbound: mpsc::Receiver<Message>,
    open: Arc<AtomicBool>,
) {
    while let Some(message) = outbound.recv().await {
        if let Err(e) = sink.send(message).await {
            tracing::error!(error = %e, "backend write failed");
            break;
        }
    }
    open.store(false, Ordering::SeqCst);
}

async fn read_loop(
    mut source: SplitStream<WsStream>,
    table: Arc<CorrelationTable>,
    open: Arc<AtomicBool>,
) {
    while let Some(result) = source.next().await {
        match result {
            Ok(Message::Text(text)) => dispatch(text.as_str(), &table),
            Ok(Message::Close(frame)) => {
                tracing::info!(frame = ?frame, "backend connection closed");
                break;
            }
            // Pings are answered by the transport; binary frames carry no replies.
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "backend read failed");
                break;
            }
        }
    }
    open.store(false, Ordering::SeqCst);

    let dropped = table.fail_pending();
    if dropped > 0 {
        tracing::warn!(pending = dropped, "session ended with exchanges still waiting");
    }
}

/// Turn one inbound frame into a targeted wakeup via the correlation table.
fn dispatch(text: &str, table: &CorrelationTable) {
    let frame: InboundFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            // Malformed frames must never take the receive loop down.
            tracing::warn!(error = %e, "unparseable backend frame dropped");
            return;
        }
    };

    let user_id = frame.user_id.clone();
    if !table.resolve(&user_id, frame.into_content()) {
        tracing::debug!(user_id = %user_id, "reply without a pending exchange dropped");
    }
}
