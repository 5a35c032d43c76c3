use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription marker meaning "every event type".
pub const WILDCARD_EVENT: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookStatus {
    Active,
    Disabled,
    Paused,
}

impl WebhookStatus {
    pub const ALL: [WebhookStatus; 3] = [Self::Active, Self::Disabled, Self::Paused];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Disabled => "Disabled",
            Self::Paused => "Paused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

impl fmt::Display for WebhookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Self::Development, Self::Staging, Self::Production];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMetrics {
    pub total_attempts: u64,
    pub successful_deliveries: u64,
    pub failed_deliveries: u64,
    pub avg_latency_ms: u64,
}

/// Retry settings shown on an endpoint. Nothing executes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_interval_seconds: u64,
    pub multiplier: f64,
    pub max_interval_seconds: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_interval_seconds: 60,
            multiplier: 2.0,
            max_interval_seconds: 3600,
        }
    }
}

/// One row of an ordered key/value list (custom headers, draft metadata).
/// The `id` identifies the row while it is being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueEntry {
    pub id: String,
    pub key: String,
    pub value: String,
}

impl KeyValueEntry {
    pub fn new(id: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Self::new(id, "", "")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    None,
    Basic,
    Bearer,
}

impl AuthType {
    pub const ALL: [AuthType; 3] = [Self::None, Self::Basic, Self::Bearer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Bearer => "bearer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthConfig {
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl AuthConfig {
    pub fn auth_type(&self) -> AuthType {
        match self {
            Self::None => AuthType::None,
            Self::Basic { .. } => AuthType::Basic,
            Self::Bearer { .. } => AuthType::Bearer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    pub status: WebhookStatus,
    pub events: Vec<String>,
    pub description: String,
    pub secret: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_event_sent_at: Option<DateTime<Utc>>,
    pub delivery_metrics: DeliveryMetrics,
    pub retry_policy: RetryPolicy,
    pub headers: Vec<KeyValueEntry>,
    pub auth_config: AuthConfig,
    pub ssl_verification_enabled: bool,
    pub metadata: BTreeMap<String, String>,
    pub owner_id: String,
    pub environment: Environment,
    pub tags: Vec<String>,
}

impl Webhook {
    pub fn is_wildcard(&self) -> bool {
        self.events.first().is_some_and(|e| e == WILDCARD_EVENT)
    }
}
