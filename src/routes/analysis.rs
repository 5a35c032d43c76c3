use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::store::{Action, AnalysisState, AnalyzeRejection};

/// Select the event (unless it already is) and start analysing it.
/// Calling this again while a call is running returns the running state.
pub async fn start(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisState>, AppError> {
    match state.store.analyze_event(&id).await {
        Ok(analysis) => Ok(Json(analysis)),
        Err(AnalyzeRejection::UnknownEvent) => Err(AppError::NotFound("Event not found".to_string())),
        Err(AnalyzeRejection::NotFailed(status)) => Err(AppError::BadRequest(format!(
            "Only failed events can be analysed (event is {status})"
        ))),
    }
}

pub async fn current(State(state): State<SharedState>) -> Json<AnalysisState> {
    Json(state.store.read(|s| s.analysis.clone()).await)
}

/// Close the inspector, abandoning any running analysis.
pub async fn dismiss(State(state): State<SharedState>) -> Json<AnalysisState> {
    Json(
        state
            .store
            .dispatch_then(Action::CloseEvent, |s| s.analysis.clone())
            .await,
    )
}
