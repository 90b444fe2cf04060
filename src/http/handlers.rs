use axum::{
    extract::{RawQuery, State},
    response::Html,
    Json,
};
use serde::Serialize;
use url::form_urlencoded;

use crate::app::gallery::GalleryService;
use crate::domain::image::DisplayItem;
use crate::http::{pages, AppError};
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct ImageListResponse {
    pub items: Vec<DisplayItem>,
}

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Value of the `screen` query parameter; the last one wins when repeated.
fn screen_param(query: Option<&str>) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .filter(|(name, _)| name == "screen")
        .last()
        .map(|(_, value)| value.into_owned())
}

pub async fn gallery_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, AppError> {
    let screen = screen_param(query.as_deref());
    let items = load_items(&state, screen.as_deref()).await?;

    let page = pages::gallery(&items, screen.as_deref()).map_err(|err| {
        tracing::error!(error = ?err, "failed to render gallery page");
        AppError::internal("failed to render gallery page")
    })?;
    Ok(Html(page))
}

pub async fn list_images(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<ImageListResponse>, AppError> {
    let screen = screen_param(query.as_deref());
    let items = load_items(&state, screen.as_deref()).await?;
    Ok(Json(ImageListResponse { items }))
}

async fn load_items(state: &AppState, screen: Option<&str>) -> Result<Vec<DisplayItem>, AppError> {
    let service = GalleryService::new(state.images.clone(), state.signer.clone());

    let records = service.fetch().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to fetch image listing");
        AppError::bad_gateway("failed to fetch image listing")
    })?;

    service.assemble(&records, screen).map_err(|err| {
        tracing::error!(error = ?err, screen = ?screen, "failed to assemble image listing");
        AppError::internal("failed to assemble image listing")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_param_reads_the_last_value() {
        assert_eq!(screen_param(Some("screen=11&screen=5s")).as_deref(), Some("5s"));
        assert_eq!(screen_param(Some("a=1&screen=16")).as_deref(), Some("16"));
    }

    #[test]
    fn screen_param_is_absent_without_the_key() {
        assert_eq!(screen_param(None), None);
        assert_eq!(screen_param(Some("")), None);
        assert_eq!(screen_param(Some("screens=11")), None);
    }

    #[test]
    fn screen_param_is_percent_decoded() {
        assert_eq!(screen_param(Some("screen=%35s")).as_deref(), Some("5s"));
        assert_eq!(screen_param(Some("screen=")).as_deref(), Some(""));
    }
}
