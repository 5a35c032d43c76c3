use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::AppError;
use crate::listing::{self, Page, EVENTS_PER_PAGE};
use crate::models::WebhookEvent;
use crate::routes::ListParams;
use crate::state::SharedState;
use crate::store::Overview;

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Json<Page<WebhookEvent>> {
    let filters = params.filters();
    let page = params.page();
    let result = state
        .store
        .read(|s| listing::page_of(&s.events, &filters, page, EVENTS_PER_PAGE))
        .await;
    Json(result)
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<WebhookEvent>, AppError> {
    let event = state
        .store
        .read(|s| s.event(&id).cloned())
        .await
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    Ok(Json(event))
}

pub async fn overview(State(state): State<SharedState>) -> Json<Overview> {
    Json(state.store.read(|s| s.overview()).await)
}
