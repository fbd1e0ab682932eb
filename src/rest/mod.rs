// rest/mod.rs — Public REST API server.
//
// Axum HTTP server, permissive CORS (the browser SPA is a separate origin).
//
// Endpoints:
//   GET  /api/health
//   POST /api/auth/signup
//   POST /api/auth/login
//   GET  /api/auth/me
//   GET  /api/cars                 (search/filter/sort/pagination)
//   GET  /api/cars/my-cars         (seller)
//   GET  /api/cars/{id}
//   POST /api/cars                 (seller)
//   PUT  /api/cars/{id}            (seller, owner)
//   DELETE /api/cars/{id}          (seller, owner)
//   POST /api/offers               (buyer)
//   GET  /api/offers/my-offers
//   GET  /api/offers/seller-requests (seller)
//   GET  /api/offers/car/{carId}   (owner)
//   PUT  /api/offers/{id}/status   (seller, owner)
//   /uploads/*                     (static listing images)

pub mod auth;
pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("CarHub API listening on http://{}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let uploads = ServeDir::new(ctx.config.uploads_dir());
    Router::new()
        // Health (no auth)
        .route("/api/health", get(routes::health::health))
        // Auth
        .route("/api/auth/signup", post(routes::auth::signup))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/me", get(routes::auth::me))
        // Cars
        .route(
            "/api/cars",
            get(routes::cars::list_cars).post(routes::cars::create_car),
        )
        .route("/api/cars/my-cars", get(routes::cars::my_cars))
        .route(
            "/api/cars/{id}",
            get(routes::cars::get_car)
                .put(routes::cars::update_car)
                .delete(routes::cars::delete_car),
        )
        // Offers
        .route("/api/offers", post(routes::offers::create_offer))
        .route("/api/offers/my-offers", get(routes::offers::my_offers))
        .route(
            "/api/offers/seller-requests",
            get(routes::offers::seller_requests),
        )
        .route("/api/offers/car/{carId}", get(routes::offers::car_offers))
        .route(
            "/api/offers/{id}/status",
            put(routes::offers::update_offer_status),
        )
        // Static listing images
        .nest_service("/uploads", uploads)
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
