//! REST broadcast endpoint.
//!
//! `GET {path}` sends the configured message to the default channel of every
//! guild the client can see and answers with how many channels were reached.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use herald_core::BoxedClient;

/// The client handle shared with the REST endpoint; empty until the runtime
/// starts.
pub type ClientSlot = Arc<RwLock<Option<BoxedClient>>>;

/// Shared state of the REST endpoint.
#[derive(Clone)]
pub struct RestState {
    client: ClientSlot,
    message: Arc<str>,
}

impl RestState {
    pub fn new(client: ClientSlot, message: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            message: message.into(),
        }
    }
}

/// Body of a successful broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BroadcastSummary {
    /// Guilds returned by the client.
    pub guilds: usize,
    /// Default channels the message was delivered to.
    pub delivered: usize,
}

/// Builds the router serving the broadcast endpoint at `path`.
pub fn router(path: &str, state: RestState) -> Router {
    Router::new()
        .route(path, get(broadcast_handler))
        .with_state(state)
}

/// Serves `router` on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "REST endpoint listening");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("REST endpoint shut down");
    Ok(())
}

async fn broadcast_handler(State(state): State<RestState>) -> Response {
    let Some(client) = state.client.read().clone() else {
        warn!("Broadcast requested before the runtime started");
        return (StatusCode::SERVICE_UNAVAILABLE, "runtime not started").into_response();
    };

    let guilds = match client.guilds().await {
        Ok(guilds) => guilds,
        Err(e) => {
            error!(error = %e, "Failed to list guilds");
            return (StatusCode::BAD_GATEWAY, "failed to list guilds").into_response();
        }
    };

    let mut delivered = 0;
    for guild in &guilds {
        let Some(channel_id) = guild.default_channel_id else {
            debug!(guild = %guild.name, "Guild has no default channel, skipping");
            continue;
        };
        match client.send_message(channel_id, &state.message).await {
            Ok(_) => delivered += 1,
            Err(e) => {
                warn!(guild = %guild.name, channel_id, error = %e, "Broadcast to guild failed");
            }
        }
    }

    info!(guilds = guilds.len(), delivered, "Broadcast finished");
    Json(BroadcastSummary {
        guilds: guilds.len(),
        delivered,
    })
    .into_response()
}
