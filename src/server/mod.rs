//! HTTP surface: chat, streaming chat, tool listing, and health.

pub mod error;
pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agent::Agent;
use crate::error::AgentError;

pub use error::ApiError;

pub const SERVICE_NAME: &str = "graph-agent";

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub agent: Agent,
}

pub fn router(agent: Agent) -> Router {
    Router::new()
        .route("/chat", post(routes::chat))
        .route(
            "/chat/stream",
            post(routes::chat_stream_post).get(routes::chat_stream_get),
        )
        .route("/tools", get(routes::list_tools))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { agent })
}

/// Bind `bind_address` and serve until Ctrl-C.
pub async fn serve(agent: Agent, bind_address: &str) -> Result<(), AgentError> {
    let listener = TcpListener::bind(bind_address).await?;
    info!(
        bind_address = %listener.local_addr()?,
        tools = agent.registry().len(),
        "graph-agent listening"
    );
    axum::serve(listener, router(agent))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
