use crate::analysis::EMPTY_ANALYSIS;
use crate::listing::FilterOptions;
use crate::models::{DraftEdit, EventStatus, SaveStamp, WebhookFormData};

use super::state::{AnalysisState, DashboardState, Tab};

/// Every change the console can make to its state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectTab(Tab),
    SetWebhookFilter(FilterOptions),
    SetWebhookPage(usize),
    SetEventFilter(FilterOptions),
    SetEventPage(usize),
    OpenEditor(WebhookFormData),
    EditDraft(DraftEdit),
    CloseEditor,
    /// Save the open draft and close the editor.
    SaveEditor(SaveStamp),
    /// Save a draft that did not come from the editor.
    SaveWebhook {
        draft: WebhookFormData,
        stamp: SaveStamp,
    },
    DeleteWebhook(String),
    OpenEvent(String),
    CloseEvent,
    BeginAnalysis,
    AnalysisSucceeded {
        generation: u64,
        text: String,
    },
    AnalysisFailed {
        generation: u64,
        message: String,
    },
}

pub fn reduce(mut state: DashboardState, action: Action) -> DashboardState {
    match action {
        Action::SelectTab(tab) => state.active_tab = tab,
        // Filters leave the current page alone.
        Action::SetWebhookFilter(filters) => state.webhook_filters = filters,
        Action::SetWebhookPage(page) => state.webhook_page = page,
        Action::SetEventFilter(filters) => state.event_filters = filters,
        Action::SetEventPage(page) => state.event_page = page,
        Action::OpenEditor(draft) => state.editor = Some(draft),
        Action::EditDraft(edit) => {
            if let Some(draft) = state.editor.as_mut() {
                draft.apply(edit);
            }
        }
        Action::CloseEditor => state.editor = None,
        Action::SaveEditor(stamp) => {
            if let Some(draft) = state.editor.take() {
                save(&mut state, draft, &stamp);
            }
        }
        Action::SaveWebhook { draft, stamp } => save(&mut state, draft, &stamp),
        Action::DeleteWebhook(id) => state.webhooks.retain(|w| w.id != id),
        Action::OpenEvent(id) => {
            if state.event(&id).is_some() {
                state.selected_event = Some(id);
                reset_analysis(&mut state.analysis);
            }
        }
        Action::CloseEvent => {
            state.selected_event = None;
            reset_analysis(&mut state.analysis);
        }
        Action::BeginAnalysis => {
            let failed = state
                .selected_event()
                .is_some_and(|e| e.status == EventStatus::Failed);
            if failed && !state.analysis.loading {
                let analysis = &mut state.analysis;
                analysis.event_id = state.selected_event.clone();
                analysis.loading = true;
                analysis.text.clear();
                analysis.error.clear();
                analysis.generation += 1;
            }
        }
        Action::AnalysisSucceeded { generation, text } => {
            if is_current(&state.analysis, generation) {
                state.analysis.loading = false;
                state.analysis.text = if text.is_empty() {
                    EMPTY_ANALYSIS.to_string()
                } else {
                    text
                };
            }
        }
        Action::AnalysisFailed {
            generation,
            message,
        } => {
            if is_current(&state.analysis, generation) {
                state.analysis.loading = false;
                state.analysis.error = message;
            }
        }
    }
    state
}

fn is_current(analysis: &AnalysisState, generation: u64) -> bool {
    analysis.loading && analysis.generation == generation
}

/// Discard any analysis and invalidate an outstanding one.
fn reset_analysis(analysis: &mut AnalysisState) {
    *analysis = AnalysisState {
        generation: analysis.generation + 1,
        ..AnalysisState::default()
    };
}

/// Replace the record with the draft's id in place, or prepend a new one.
/// A draft whose id matches nothing changes nothing.
fn save(state: &mut DashboardState, draft: WebhookFormData, stamp: &SaveStamp) {
    match draft.id.clone() {
        Some(id) => {
            if let Some(pos) = state.webhooks.iter().position(|w| w.id == id) {
                let updated = draft.promote(Some(&state.webhooks[pos]), stamp);
                state.webhooks[pos] = updated;
            }
        }
        None => {
            let created = draft.promote(None, stamp);
            state.webhooks.insert(0, created);
        }
    }
}
