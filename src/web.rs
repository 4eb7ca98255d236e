use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, ApiState};

/// Full application router, CORS included
pub fn app(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new().nest("/api", api::router(state)).layer(cors)
}

pub async fn run(port: u16, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("PowCollective API listening on {}", port);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
