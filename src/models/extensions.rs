//! Record shapes for console sections that are listed in the navigation but
//! have no behaviour yet (global settings, API keys, alert rules, audit log,
//! analytics, charts, event replay and test events). Nothing produces or
//! consumes these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::EventStatus;
use super::webhook::KeyValueEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSettings {
    pub max_retries: u32,
    pub retry_interval_seconds: Vec<u64>,
    pub timeout_ms: u64,
    pub secret_signing_enabled: bool,
    pub delivery_attempts_logging_enabled: bool,
    pub default_headers: Vec<KeyValueEntry>,
    pub ip_whitelist: Vec<String>,
    pub rate_limit_enabled: bool,
    pub rate_limit_requests_per_minute: u32,
    pub event_transformation_enabled: bool,
    pub custom_certs_enabled: bool,
    pub custom_certificates: Vec<CustomCertificate>,
    pub dead_letter_queue_enabled: bool,
    pub dead_letter_queue_config: Option<DeadLetterQueueConfig>,
    pub global_monitoring_enabled: bool,
    pub webhook_batching_enabled: bool,
    pub batching_interval_ms: Option<u64>,
    pub batching_max_events: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomCertificate {
    pub id: String,
    pub name: String,
    pub cert: String,
    pub expiration: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetterQueueConfig {
    #[serde(rename = "type")]
    pub kind: DeadLetterTarget,
    pub target: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadLetterTarget {
    S3,
    Kafka,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub permissions: Vec<String>,
    pub status: ApiKeyStatus,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ApiKeyStatus {
    Active,
    Revoked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub threshold: f64,
    pub duration_minutes: u32,
    pub webhook_id: Option<String>,
    pub status: AlertRuleStatus,
    pub channels: Vec<AlertChannel>,
    pub severity: Severity,
    pub metric_path: Option<String>,
    pub operator: Option<Comparison>,
    pub condition: Option<MatchCondition>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    WebhookFailureRate,
    EventLatency,
    DeliverySuccessRate,
    EndpointDown,
    CustomMetric,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum AlertRuleStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertChannel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub recipient: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Slack,
    Sms,
    Pagerduty,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Gt,
    Lt,
    Eq,
    Gte,
    Lte,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchCondition {
    All,
    Any,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: String,
    pub resource_type: AuditResource,
    pub resource_id: String,
    pub details: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditResource {
    Webhook,
    ApiKey,
    Settings,
    Event,
    AlertRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_endpoints: u64,
    pub active_endpoints: u64,
    pub disabled_endpoints: u64,
    pub total_events_delivered_24h: u64,
    pub failure_rate_24h: f64,
    pub avg_latency_ms_24h: f64,
    pub pending_events: u64,
    pub retrying_events: u64,
    pub top_failed_endpoints: Vec<FailedEndpoint>,
    pub event_distribution: Vec<EventTypeCount>,
    pub latency_p99_ms: f64,
    pub total_events_processed_month: u64,
    pub successful_events_month: u64,
    pub failed_events_month: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedEndpoint {
    pub id: String,
    pub url: String,
    pub failures: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTypeCount {
    #[serde(rename = "type")]
    pub event_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: Vec<ChartDataPoint>,
    pub unit: Option<String>,
    pub timeframe: Option<Timeframe>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub time: String,
    pub value: f64,
    pub label: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventReplayConfig {
    pub webhook_ids: Vec<String>,
    pub event_types: Vec<String>,
    /// `None` replays every status.
    pub status_filter: Option<EventStatus>,
    pub date_range: DateRange,
    pub max_events: u32,
    pub batch_size: u32,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestEventConfig {
    pub webhook_id: Option<String>,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub headers: Vec<KeyValueEntry>,
    pub metadata: Vec<KeyValueEntry>,
    pub expected_response_status: Option<u16>,
    pub timeout_ms: Option<u64>,
}
