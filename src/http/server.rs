//! HTTP server setup and the `/send` endpoint.
//!
//! # Responsibilities
//! - Create Axum Router with the send handler
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Connect the shared backend session at startup
//! - Map exchange errors to gateway status codes
//! - Observability (metrics, request IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::backend::types::{BridgeError, BridgeResult};
use crate::backend::BackendSession;
use crate::config::BridgeConfig;
use crate::correlation::CorrelationTable;
use crate::exchange::Coordinator;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
}

/// Request body for `POST /send`.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub user_id: String,
    pub message: String,
}

/// Response body for `POST /send`.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub response: String,
}

/// HTTP server bridging callers to the backend session.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    config: BridgeConfig,
    table: Arc<CorrelationTable>,
    session: Arc<BackendSession>,
}

impl HttpServer {
    /// Connect the backend session and assemble the server around it.
    pub async fn connect(config: BridgeConfig) -> BridgeResult<Self> {
        let table = Arc::new(CorrelationTable::new());
        let session = Arc::new(
            BackendSession::connect(
                &config.backend,
                config.timeouts.connect_timeout(),
                table.clone(),
            )
            .await?,
        );
        let coordinator = Arc::new(Coordinator::new(
            table.clone(),
            session.clone(),
            config.timeouts.reply_timeout(),
        ));

        let state = AppState { coordinator };
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config,
            table,
            session,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &BridgeConfig, state: AppState) -> Router {
        Router::new()
            .route("/send", post(send_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut stop = shutdown.subscribe();
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await?;

        self.session.close().await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Correlation table handle, exposed for probes.
    pub fn table(&self) -> Arc<CorrelationTable> {
        self.table.clone()
    }
}

/// Main exchange handler.
async fn send_handler(State(state): State<AppState>, Json(request): Json<SendRequest>) -> Response {
    let start = Instant::now();

    if request.user_id.is_empty() {
        metrics::record_exchange(400, start);
        return (StatusCode::BAD_REQUEST, "user_id must not be empty").into_response();
    }

    tracing::debug!(user_id = %request.user_id, "exchange starting");

    match state
        .coordinator
        .exchange(&request.user_id, &request.message)
        .await
    {
        Ok(content) => {
            metrics::record_exchange(200, start);
            Json(SendResponse { response: content }).into_response()
        }
        Err(e) => {
            let status = status_for(&e);
            tracing::error!(user_id = %request.user_id, error = %e, "exchange failed");
            metrics::record_exchange(status.as_u16(), start);
            (status, e.to_string()).into_response()
        }
    }
}

/// Gateway-style mapping: a reply wait that runs out is 504, everything else
/// the backend spoils is 502.
fn status_for(error: &BridgeError) -> StatusCode {
    match error {
        BridgeError::ReplyTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&BridgeError::ReplyTimeout(30)),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&BridgeError::Send("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&BridgeError::ConnectTimeout(10)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status_for(&BridgeError::Closed), StatusCode::BAD_GATEWAY);
    }
}
