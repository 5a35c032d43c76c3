use serde::Serialize;

use crate::listing::{self, FilterOptions, Page, EVENTS_PER_PAGE, WEBHOOKS_PER_PAGE};
use crate::models::{EventStatus, Webhook, WebhookEvent, WebhookFormData, WebhookStatus};

/// Console sections. Only dashboard, endpoints and events have content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Dashboard,
    Endpoints,
    Events,
    Alerts,
    ApiKeys,
    Settings,
    AuditLog,
    Testing,
}

impl Tab {
    pub const ALL: [Tab; 8] = [
        Self::Dashboard,
        Self::Endpoints,
        Self::Events,
        Self::Alerts,
        Self::ApiKeys,
        Self::Settings,
        Self::AuditLog,
        Self::Testing,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Endpoints => "endpoints",
            Self::Events => "events",
            Self::Alerts => "alerts",
            Self::ApiKeys => "api-keys",
            Self::Settings => "settings",
            Self::AuditLog => "audit-log",
            Self::Testing => "testing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Endpoints => "Endpoints",
            Self::Events => "Events Log",
            Self::Alerts => "Alerts",
            Self::ApiKeys => "API Keys",
            Self::Settings => "Global Settings",
            Self::AuditLog => "Audit Log",
            Self::Testing => "Dev Tools",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Self::Dashboard | Self::Endpoints | Self::Events)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisState {
    /// Event the current (or last) analysis belongs to.
    pub event_id: Option<String>,
    pub loading: bool,
    pub text: String,
    pub error: String,
    /// Bumped whenever an outstanding analysis becomes irrelevant.
    pub generation: u64,
}

/// Everything the console shows, owned by the [`Store`](super::Store).
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub active_tab: Tab,
    pub webhooks: Vec<Webhook>,
    pub events: Vec<WebhookEvent>,
    pub webhook_page: usize,
    pub event_page: usize,
    pub webhook_filters: FilterOptions,
    pub event_filters: FilterOptions,
    /// Open endpoint editor.
    pub editor: Option<WebhookFormData>,
    /// Event shown in the inspector.
    pub selected_event: Option<String>,
    pub analysis: AnalysisState,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_webhooks: usize,
    pub active_webhooks: usize,
    /// Delivered share of settled (delivered or failed) events, in percent.
    pub success_rate: Option<f64>,
    /// Mean of the webhooks' recorded average latency.
    pub avg_latency_ms: Option<u64>,
    pub failed_events: usize,
}

impl DashboardState {
    pub fn new(webhooks: Vec<Webhook>, events: Vec<WebhookEvent>) -> Self {
        Self {
            active_tab: Tab::default(),
            webhooks,
            events,
            webhook_page: 1,
            event_page: 1,
            webhook_filters: FilterOptions::default(),
            event_filters: FilterOptions::default(),
            editor: None,
            selected_event: None,
            analysis: AnalysisState::default(),
        }
    }

    pub fn webhook(&self, id: &str) -> Option<&Webhook> {
        self.webhooks.iter().find(|w| w.id == id)
    }

    pub fn event(&self, id: &str) -> Option<&WebhookEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn selected_event(&self) -> Option<&WebhookEvent> {
        self.selected_event.as_deref().and_then(|id| self.event(id))
    }

    /// The inspector offers analysis for a failed event with no call in flight.
    pub fn can_analyze(&self) -> bool {
        !self.analysis.loading
            && self
                .selected_event()
                .is_some_and(|e| e.status == EventStatus::Failed)
    }

    pub fn webhook_page(&self) -> Page<Webhook> {
        listing::page_of(
            &self.webhooks,
            &self.webhook_filters,
            self.webhook_page,
            WEBHOOKS_PER_PAGE,
        )
    }

    pub fn event_page(&self) -> Page<WebhookEvent> {
        listing::page_of(
            &self.events,
            &self.event_filters,
            self.event_page,
            EVENTS_PER_PAGE,
        )
    }

    pub fn overview(&self) -> Overview {
        let active_webhooks = self
            .webhooks
            .iter()
            .filter(|w| w.status == WebhookStatus::Active)
            .count();
        let delivered = self
            .events
            .iter()
            .filter(|e| e.status == EventStatus::Delivered)
            .count();
        let failed_events = self
            .events
            .iter()
            .filter(|e| e.status == EventStatus::Failed)
            .count();

        let settled = delivered + failed_events;
        let success_rate =
            (settled > 0).then(|| delivered as f64 * 100.0 / settled as f64);

        let avg_latency_ms = (!self.webhooks.is_empty()).then(|| {
            self.webhooks
                .iter()
                .map(|w| w.delivery_metrics.avg_latency_ms)
                .sum::<u64>()
                / self.webhooks.len() as u64
        });

        Overview {
            total_webhooks: self.webhooks.len(),
            active_webhooks,
            success_rate,
            avg_latency_ms,
            failed_events,
        }
    }
}
