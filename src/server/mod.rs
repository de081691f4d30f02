use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::config::ServeSettings;
use crate::entity::{Entity, Order, Product};
use crate::storage::SessionProvider;

pub mod error;
pub mod routes;

/// Server state
pub struct AppState {
    pub sessions: SessionProvider,
}

/// The five CRUD routes for one entity type
fn entity_routes<E: Entity>() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", get(routes::list_entities::<E>))
        .route("/get/{id}", get(routes::get_entity::<E>))
        .route("/add", post(routes::add_entity::<E>))
        .route("/update/{id}", put(routes::update_entity::<E>))
        .route("/delete/{id}", delete(routes::delete_entity::<E>))
}

/// Build the application router
pub fn router(state: Arc<AppState>, cors: bool) -> Router {
    let app = Router::new()
        .route("/health", get(routes::health))
        .nest("/product", entity_routes::<Product>())
        .nest("/order", entity_routes::<Order>())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

pub async fn start_server(settings: ServeSettings) -> anyhow::Result<()> {
    let sessions = SessionProvider::open(&settings.database)?;
    let state = Arc::new(AppState { sessions });
    let app = router(state, settings.cors);

    let addr = settings.address();
    tracing::info!("Starting server on {} (cors: {})", addr, settings.cors);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
