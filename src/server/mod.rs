mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::location::LocationResolver;
use crate::session::FlatTerrain;

pub fn build_router(resolver: Arc<LocationResolver>, terrain: FlatTerrain) -> Router {
    let state = Arc::new(AppState { resolver, terrain });

    Router::new()
        .route("/api/place", get(handlers::place))
        .route("/api/address", get(handlers::address))
        .route("/api/geo", get(handlers::geo))
        .route("/api/cities", get(handlers::city_list))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(resolver: Arc<LocationResolver>, terrain: FlatTerrain, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(resolver, terrain);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Terraport server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}
