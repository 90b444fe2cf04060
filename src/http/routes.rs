use axum::{routing::get, Router};

use crate::AppState;
use crate::http::handlers;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn gallery() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::gallery_page))
        .route("/images", get(handlers::list_images))
}
