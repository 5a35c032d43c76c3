use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Form;
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::back_to_console;
use super::editor::{parse_editor_form, EditorOp};
use crate::listing::FilterOptions;
use crate::models::{DraftEdit, SaveStamp, WebhookFormData};
use crate::state::SharedState;
use crate::store::Action;

#[derive(Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: String,
}

impl FilterForm {
    pub fn into_options(self) -> FilterOptions {
        FilterOptions {
            search_term: Some(self.search).filter(|s| !s.is_empty()),
            status: Some(self.status).filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Deserialize)]
pub struct PageForm {
    pub page: usize,
}

pub async fn filter(State(state): State<SharedState>, Form(form): Form<FilterForm>) -> Redirect {
    state
        .store
        .dispatch(Action::SetWebhookFilter(form.into_options()))
        .await;
    back_to_console()
}

pub async fn page(State(state): State<SharedState>, Form(form): Form<PageForm>) -> Redirect {
    state.store.dispatch(Action::SetWebhookPage(form.page)).await;
    back_to_console()
}

pub async fn new_webhook(State(state): State<SharedState>) -> Redirect {
    let draft = WebhookFormData::blank(new_row_id(), new_row_id());
    state.store.dispatch(Action::OpenEditor(draft)).await;
    back_to_console()
}

pub async fn configure(State(state): State<SharedState>, Path(id): Path<String>) -> Redirect {
    let draft = state
        .store
        .read(|s| s.webhook(&id).map(WebhookFormData::from_webhook))
        .await;

    match draft {
        Some(draft) => state.store.dispatch(Action::OpenEditor(draft)).await,
        None => tracing::debug!("Configure requested for unknown webhook {id}"),
    }
    back_to_console()
}

pub async fn delete(State(state): State<SharedState>, Path(id): Path<String>) -> Redirect {
    state.store.dispatch(Action::DeleteWebhook(id.clone())).await;
    tracing::info!("Deleted webhook {id}");
    back_to_console()
}

/// Every editor button posts the whole form, so the typed values are kept
/// before the requested operation runs.
pub async fn submit_editor(State(state): State<SharedState>, body: Bytes) -> Redirect {
    let Some(base) = state.store.read(|s| s.editor.clone()).await else {
        return back_to_console();
    };

    let submission = parse_editor_form(&body, &base);
    state
        .store
        .dispatch(Action::EditDraft(DraftEdit::Replace(submission.draft)))
        .await;

    match submission.op {
        EditorOp::Save => {
            let stamp = SaveStamp::generate(Utc::now());
            let id = base.id.clone().unwrap_or_else(|| stamp.id.clone());
            state.store.dispatch(Action::SaveEditor(stamp)).await;
            tracing::info!("Saved webhook {id} from editor");
        }
        EditorOp::Cancel => state.store.dispatch(Action::CloseEditor).await,
        EditorOp::AddEntry(list) => {
            let edit = DraftEdit::AddEntry {
                list,
                id: new_row_id(),
            };
            state.store.dispatch(Action::EditDraft(edit)).await;
        }
        EditorOp::RemoveEntry(list, id) => {
            state
                .store
                .dispatch(Action::EditDraft(DraftEdit::RemoveEntry { list, id }))
                .await;
        }
        EditorOp::Refresh => {}
    }

    back_to_console()
}

fn new_row_id() -> String {
    Uuid::new_v4().to_string()
}
