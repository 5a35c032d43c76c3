pub mod reducer;
pub mod state;

use std::sync::{Arc, Weak};

use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use crate::analysis::{build_prompt, AnalysisError, FailureAnalyzer};
use crate::models::EventStatus;

pub use reducer::{reduce, Action};
pub use state::{AnalysisState, DashboardState, Overview, Tab};

/// Why [`Store::analyze_event`] refused to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeRejection {
    UnknownEvent,
    NotFailed(EventStatus),
}

/// Session-wide holder of the console state and of the one analysis task.
///
/// All mutation goes through [`reduce`] under the store's lock, so actions are
/// applied one at a time.
pub struct Store {
    inner: Mutex<Inner>,
    analyzer: Arc<dyn FailureAnalyzer>,
}

struct Inner {
    state: DashboardState,
    /// Outstanding analysis call and the generation it was started for.
    analysis_task: Option<(u64, AbortHandle)>,
}

impl Inner {
    fn apply(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
        self.reap_analysis_task();
    }

    /// Abort the outstanding call once the state no longer waits for it.
    fn reap_analysis_task(&mut self) {
        let analysis = &self.state.analysis;
        let stale = self
            .analysis_task
            .as_ref()
            .is_some_and(|(generation, _)| !analysis.loading || *generation != analysis.generation);
        if stale {
            if let Some((generation, handle)) = self.analysis_task.take() {
                if !handle.is_finished() {
                    tracing::debug!("Aborting analysis call (generation {generation})");
                }
                handle.abort();
            }
        }
    }
}

impl Store {
    pub fn new(state: DashboardState, analyzer: Arc<dyn FailureAnalyzer>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                state,
                analysis_task: None,
            }),
            analyzer,
        })
    }

    pub async fn dispatch(&self, action: Action) {
        self.inner.lock().await.apply(action);
    }

    /// Apply `action` and read the resulting state under the same lock.
    pub async fn dispatch_then<R>(&self, action: Action, f: impl FnOnce(&DashboardState) -> R) -> R {
        let mut inner = self.inner.lock().await;
        inner.apply(action);
        f(&inner.state)
    }

    pub async fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.inner.lock().await.state)
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.read(|s| s.clone()).await
    }

    /// Start analysing the selected event unless a call is already running or
    /// the selection is not a failed event. Returns the resulting analysis state.
    pub async fn begin_analysis(self: &Arc<Self>) -> AnalysisState {
        let mut inner = self.inner.lock().await;
        self.start_analysis(&mut inner)
    }

    /// Select event `id` (unless it already is) and start analysing it, all
    /// under one lock so a concurrent selection cannot slip in between.
    pub async fn analyze_event(
        self: &Arc<Self>,
        id: &str,
    ) -> Result<AnalysisState, AnalyzeRejection> {
        let mut inner = self.inner.lock().await;
        match inner.state.event(id).map(|e| e.status) {
            None => return Err(AnalyzeRejection::UnknownEvent),
            Some(EventStatus::Failed) => {}
            Some(other) => return Err(AnalyzeRejection::NotFailed(other)),
        }

        if inner.state.selected_event.as_deref() != Some(id) {
            inner.apply(Action::OpenEvent(id.to_string()));
        }
        Ok(self.start_analysis(&mut inner))
    }

    fn start_analysis(self: &Arc<Self>, inner: &mut Inner) -> AnalysisState {
        let before = inner.state.analysis.generation;
        inner.apply(Action::BeginAnalysis);

        let analysis = inner.state.analysis.clone();
        if analysis.generation == before {
            return analysis;
        }

        let Some(event) = inner.state.selected_event().cloned() else {
            return analysis;
        };

        let generation = analysis.generation;
        let prompt = build_prompt(&event);
        let analyzer = Arc::clone(&self.analyzer);
        let store: Weak<Store> = Arc::downgrade(self);

        tracing::info!(
            "Analysing failed event {} with {} (generation {generation})",
            event.id,
            analyzer.name()
        );

        let handle = tokio::spawn(async move {
            let outcome = analyzer.analyze(&prompt).await;
            if let Some(store) = store.upgrade() {
                store.finish_analysis(generation, outcome).await;
            }
        });
        inner.analysis_task = Some((generation, handle.abort_handle()));

        analysis
    }

    async fn finish_analysis(&self, generation: u64, outcome: Result<String, AnalysisError>) {
        let action = match outcome {
            Ok(text) => {
                tracing::info!("Analysis {generation} completed ({} bytes)", text.len());
                Action::AnalysisSucceeded { generation, text }
            }
            Err(e) => {
                tracing::warn!("Analysis {generation} failed: {e}");
                Action::AnalysisFailed {
                    generation,
                    message: e.to_string(),
                }
            }
        };
        self.dispatch(action).await;
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.inner.get_mut().analysis_task.take() {
            handle.abort();
        }
    }
}
