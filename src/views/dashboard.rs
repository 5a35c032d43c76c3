use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;
use serde::Deserialize;

use super::back_to_console;
use super::events::AnalysisPanel;
use super::widgets::{format_count, KeyValueListView, Pager, SelectOption};
use crate::error::AppError;
use crate::listing::ALL_STATUSES;
use crate::models::{
    AttemptStatus, AuthType, Environment, EventStatus, Webhook, WebhookEvent, WebhookFormData,
    WebhookStatus,
};
use crate::state::SharedState;
use crate::store::{Action, DashboardState, Overview, Tab};

/// Event chips shown per endpoint row before collapsing into "+N".
const VISIBLE_EVENT_CHIPS: usize = 2;

#[derive(Template)]
#[template(path = "dashboard/index.html")]
#[allow(dead_code)]
struct DashboardTemplate {
    tabs: Vec<TabLink>,
    title: &'static str,
    active: &'static str,
    placeholder: bool,
    overview: OverviewCards,
    endpoints: EndpointsSection,
    events: EventsSection,
    editor: Option<EditorView>,
    inspector: Option<InspectorView>,
}

#[allow(dead_code)]
struct TabLink {
    slug: &'static str,
    label: &'static str,
    active: bool,
}

#[allow(dead_code)]
struct OverviewCards {
    total_webhooks: usize,
    active_webhooks: usize,
    success_rate: String,
    avg_latency: String,
    failed_events: usize,
}

impl From<Overview> for OverviewCards {
    fn from(o: Overview) -> Self {
        Self {
            total_webhooks: o.total_webhooks,
            active_webhooks: o.active_webhooks,
            success_rate: o
                .success_rate
                .map(|r| format!("{r:.1}%"))
                .unwrap_or_else(|| "n/a".to_string()),
            avg_latency: o
                .avg_latency_ms
                .map(|ms| format!("{ms}ms"))
                .unwrap_or_else(|| "n/a".to_string()),
            failed_events: o.failed_events,
        }
    }
}

#[allow(dead_code)]
struct EndpointsSection {
    rows: Vec<EndpointRow>,
    search: String,
    status_options: Vec<SelectOption>,
    pager: Pager,
}

#[allow(dead_code)]
struct EndpointRow {
    id: String,
    url: String,
    status: &'static str,
    active: bool,
    event_chips: Vec<String>,
    more_events: usize,
    attempts: String,
}

impl From<&Webhook> for EndpointRow {
    fn from(w: &Webhook) -> Self {
        Self {
            id: w.id.clone(),
            url: w.url.clone(),
            status: w.status.as_str(),
            active: w.status == WebhookStatus::Active,
            event_chips: w.events.iter().take(VISIBLE_EVENT_CHIPS).cloned().collect(),
            more_events: w.events.len().saturating_sub(VISIBLE_EVENT_CHIPS),
            attempts: format_count(w.delivery_metrics.total_attempts),
        }
    }
}

#[allow(dead_code)]
struct EventsSection {
    rows: Vec<EventRow>,
    search: String,
    status_options: Vec<SelectOption>,
    pager: Pager,
}

#[allow(dead_code)]
struct EventRow {
    id: String,
    event_type: String,
    status: &'static str,
    delivered: bool,
    time: String,
}

impl From<&WebhookEvent> for EventRow {
    fn from(e: &WebhookEvent) -> Self {
        Self {
            id: e.id.clone(),
            event_type: e.event_type.clone(),
            status: e.status.as_str(),
            delivered: e.status == EventStatus::Delivered,
            time: e.timestamp.format("%H:%M:%S").to_string(),
        }
    }
}

#[allow(dead_code)]
struct EditorView {
    title: &'static str,
    id: String,
    url: String,
    description: String,
    secret: String,
    events: String,
    tags: String,
    status_options: Vec<SelectOption>,
    environment_options: Vec<SelectOption>,
    auth_options: Vec<SelectOption>,
    auth_token: String,
    username: String,
    password: String,
    show_bearer: bool,
    show_basic: bool,
    ssl_verification_enabled: bool,
    max_retries: u32,
    initial_interval_seconds: u64,
    multiplier: f64,
    max_interval_seconds: u64,
    headers: KeyValueListView,
    metadata: KeyValueListView,
}

impl From<&WebhookFormData> for EditorView {
    fn from(d: &WebhookFormData) -> Self {
        Self {
            title: if d.id.is_some() {
                "Edit Webhook"
            } else {
                "Create New Webhook"
            },
            id: d.id.clone().unwrap_or_default(),
            url: d.url.clone(),
            description: d.description.clone(),
            secret: d.secret.clone(),
            events: d.events.join(", "),
            tags: d.tags.join(", "),
            status_options: SelectOption::list(
                WebhookStatus::ALL.iter().map(|s| s.as_str()),
                d.status.as_str(),
            ),
            environment_options: SelectOption::list(
                Environment::ALL.iter().map(|e| e.as_str()),
                d.environment.as_str(),
            ),
            auth_options: SelectOption::list(
                AuthType::ALL.iter().map(|a| a.as_str()),
                d.auth_type.as_str(),
            ),
            auth_token: d.auth_token.clone().unwrap_or_default(),
            username: d.username.clone().unwrap_or_default(),
            password: d.password.clone().unwrap_or_default(),
            show_bearer: d.auth_type == AuthType::Bearer,
            show_basic: d.auth_type == AuthType::Basic,
            ssl_verification_enabled: d.ssl_verification_enabled,
            max_retries: d.retry_policy.max_retries,
            initial_interval_seconds: d.retry_policy.initial_interval_seconds,
            multiplier: d.retry_policy.multiplier,
            max_interval_seconds: d.retry_policy.max_interval_seconds,
            headers: KeyValueListView {
                label: "Custom Headers",
                description: "Sent with every delivery. Rows without a key are dropped on save.",
                prefix: "header",
                add_label: "+ Add Header",
                key_placeholder: "Header-Name",
                value_placeholder: "value",
                items: d.headers.clone(),
            },
            metadata: KeyValueListView {
                label: "Metadata",
                description: "Free-form labels kept with the endpoint.",
                prefix: "meta",
                add_label: "+ Add Entry",
                key_placeholder: "key",
                value_placeholder: "value",
                items: d.metadata.clone(),
            },
        }
    }
}

#[allow(dead_code)]
struct InspectorView {
    id: String,
    event_type: String,
    status: &'static str,
    payload: String,
    attempts: Vec<AttemptRow>,
    failed: bool,
    can_analyze: bool,
    analysis: AnalysisPanel,
}

#[allow(dead_code)]
struct AttemptRow {
    attempt: u32,
    status: &'static str,
    success: bool,
    http: String,
    error_details: String,
}

impl InspectorView {
    fn new(event: &WebhookEvent, state: &DashboardState) -> Self {
        Self {
            id: event.id.clone(),
            event_type: event.event_type.clone(),
            status: event.status.as_str(),
            payload: serde_json::to_string_pretty(&event.payload).unwrap_or_default(),
            attempts: event
                .delivery_attempts
                .iter()
                .map(|a| AttemptRow {
                    attempt: a.attempt,
                    status: a.status.as_str(),
                    success: a.status == AttemptStatus::Success,
                    http: a
                        .response_status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    error_details: a.error_details.clone().unwrap_or_default(),
                })
                .collect(),
            failed: event.status == EventStatus::Failed,
            can_analyze: state.can_analyze(),
            analysis: AnalysisPanel::new(&state.analysis),
        }
    }
}

fn status_options<'a>(
    statuses: impl IntoIterator<Item = &'a str>,
    current: Option<&str>,
) -> Vec<SelectOption> {
    SelectOption::list(
        std::iter::once(ALL_STATUSES).chain(statuses),
        current.unwrap_or(ALL_STATUSES),
    )
}

impl DashboardTemplate {
    fn from_state(state: &DashboardState) -> Self {
        let tab = state.active_tab;
        let webhook_page = state.webhook_page();
        let event_page = state.event_page();

        Self {
            tabs: Tab::ALL
                .iter()
                .map(|t| TabLink {
                    slug: t.slug(),
                    label: t.label(),
                    active: *t == tab,
                })
                .collect(),
            title: tab.label(),
            active: tab.slug(),
            placeholder: tab.is_placeholder(),
            overview: state.overview().into(),
            endpoints: EndpointsSection {
                rows: webhook_page.items.iter().map(EndpointRow::from).collect(),
                search: state.webhook_filters.search_term.clone().unwrap_or_default(),
                status_options: status_options(
                    WebhookStatus::ALL.iter().map(|s| s.as_str()),
                    state.webhook_filters.status.as_deref(),
                ),
                pager: Pager::new(&webhook_page, "/ui/endpoints/page"),
            },
            events: EventsSection {
                rows: event_page.items.iter().map(EventRow::from).collect(),
                search: state.event_filters.search_term.clone().unwrap_or_default(),
                status_options: status_options(
                    EventStatus::ALL.iter().map(|s| s.as_str()),
                    state.event_filters.status.as_deref(),
                ),
                pager: Pager::new(&event_page, "/ui/events/page"),
            },
            editor: state.editor.as_ref().map(EditorView::from),
            inspector: state
                .selected_event()
                .map(|event| InspectorView::new(event, state)),
        }
    }
}

pub async fn index(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let template = state.store.read(DashboardTemplate::from_state).await;
    Ok(Html(template.render()?))
}

#[derive(Deserialize)]
pub struct TabForm {
    pub tab: String,
}

pub async fn select_tab(State(state): State<SharedState>, Form(form): Form<TabForm>) -> Redirect {
    match Tab::from_slug(&form.tab) {
        Some(tab) => state.store.dispatch(Action::SelectTab(tab)).await,
        None => tracing::debug!("Ignoring unknown tab {:?}", form.tab),
    }
    back_to_console()
}
