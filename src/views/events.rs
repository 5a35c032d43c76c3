use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;

use super::back_to_console;
use super::endpoints::{FilterForm, PageForm};
use crate::error::AppError;
use crate::state::SharedState;
use crate::store::{Action, AnalysisState};

/// Inspector analysis block as shown to the user.
#[allow(dead_code)]
pub struct AnalysisPanel {
    pub loading: bool,
    pub lines: Vec<String>,
    pub error: String,
    /// Nothing requested yet for the selected event.
    pub idle: bool,
}

impl AnalysisPanel {
    pub fn new(analysis: &AnalysisState) -> Self {
        Self {
            loading: analysis.loading,
            lines: if analysis.text.is_empty() {
                Vec::new()
            } else {
                analysis.text.split('\n').map(str::to_string).collect()
            },
            error: analysis.error.clone(),
            idle: !analysis.loading && analysis.text.is_empty() && analysis.error.is_empty(),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard/analysis_panel.html")]
#[allow(dead_code)]
struct AnalysisPanelTemplate {
    panel: AnalysisPanel,
    can_analyze: bool,
}

pub async fn filter(State(state): State<SharedState>, Form(form): Form<FilterForm>) -> Redirect {
    state
        .store
        .dispatch(Action::SetEventFilter(form.into_options()))
        .await;
    back_to_console()
}

pub async fn page(State(state): State<SharedState>, Form(form): Form<PageForm>) -> Redirect {
    state.store.dispatch(Action::SetEventPage(form.page)).await;
    back_to_console()
}

pub async fn open(State(state): State<SharedState>, Path(id): Path<String>) -> Redirect {
    state.store.dispatch(Action::OpenEvent(id)).await;
    back_to_console()
}

pub async fn close(State(state): State<SharedState>) -> Redirect {
    state.store.dispatch(Action::CloseEvent).await;
    back_to_console()
}

pub async fn analyze(State(state): State<SharedState>) -> Redirect {
    state.store.begin_analysis().await;
    back_to_console()
}

/// Polled by the inspector while an analysis is running.
pub async fn analysis_partial(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let (panel, can_analyze) = state
        .store
        .read(|s| (AnalysisPanel::new(&s.analysis), s.can_analyze()))
        .await;

    let template = AnalysisPanelTemplate { panel, can_analyze };
    Ok(Html(template.render()?))
}
