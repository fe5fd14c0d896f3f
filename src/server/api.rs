use crate::models::chat::ChatReply;
use crate::relay::{ Relay, RelayError };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::post,
    Router,
    extract::State,
    Json,
};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, debug };

#[derive(Clone)]
struct AppState {
    relay: Arc<Relay>,
}

pub fn router(relay: Arc<Relay>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/agent", post(agent_handler))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(AppState { relay })
}

pub async fn start_http_server(
    addr: SocketAddr,
    relay: Arc<Relay>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = tokio::net::TcpListener::bind(addr).await
        .map_err(|e| format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e))?;
    info!("Agent proxy running on http://{}", listener.local_addr()?);

    axum::serve(listener, router(relay).into_make_service()).await?;
    Ok(())
}

async fn agent_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatReply>, RelayError> {
    // Unparsable bodies are validated like an empty one.
    let body: Value = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Ignoring unparsable request body: {}", e);
        Value::Null
    });

    let reply = state.relay.handle(&body).await?;
    Ok(Json(ChatReply { reply }))
}
