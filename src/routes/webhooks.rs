use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;

use crate::error::AppError;
use crate::listing::{self, Page, WEBHOOKS_PER_PAGE};
use crate::models::{SaveStamp, Webhook, WebhookFormData};
use crate::routes::ListParams;
use crate::state::SharedState;
use crate::store::Action;

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Json<Page<Webhook>> {
    let filters = params.filters();
    let page = params.page();
    let result = state
        .store
        .read(|s| listing::page_of(&s.webhooks, &filters, page, WEBHOOKS_PER_PAGE))
        .await;
    Json(result)
}

pub async fn create(
    State(state): State<SharedState>,
    Json(mut req): Json<WebhookFormData>,
) -> Result<Json<Webhook>, AppError> {
    req.id = None;
    let stamp = SaveStamp::generate(Utc::now());
    let id = stamp.id.clone();

    let webhook = state
        .store
        .dispatch_then(Action::SaveWebhook { draft: req, stamp }, |s| {
            s.webhook(&id).cloned()
        })
        .await
        .ok_or_else(|| AppError::Internal(format!("Webhook {id} missing after save")))?;

    tracing::info!("Webhook {} created for {}", webhook.id, webhook.url);
    Ok(Json(webhook))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Webhook>, AppError> {
    let webhook = state
        .store
        .read(|s| s.webhook(&id).cloned())
        .await
        .ok_or_else(|| AppError::NotFound("Webhook not found".to_string()))?;
    Ok(Json(webhook))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(mut req): Json<WebhookFormData>,
) -> Result<Json<Webhook>, AppError> {
    req.id = Some(id.clone());
    let stamp = SaveStamp::generate(Utc::now());

    // Saving an unknown id is a no-op, so the lookup doubles as the existence check.
    let webhook = state
        .store
        .dispatch_then(Action::SaveWebhook { draft: req, stamp }, |s| {
            s.webhook(&id).cloned()
        })
        .await
        .ok_or_else(|| AppError::NotFound("Webhook not found".to_string()))?;

    tracing::info!("Webhook {id} updated");
    Ok(Json(webhook))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let existed = state.store.read(|s| s.webhook(&id).is_some()).await;
    if !existed {
        return Err(AppError::NotFound("Webhook not found".to_string()));
    }

    state.store.dispatch(Action::DeleteWebhook(id.clone())).await;
    tracing::info!("Webhook {id} deleted");

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
