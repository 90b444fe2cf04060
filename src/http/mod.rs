use axum::Router;

use crate::AppState;

mod error;
mod handlers;
mod pages;
mod routes;

pub use error::AppError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health())
        .merge(routes::gallery())
        .with_state(state)
}
