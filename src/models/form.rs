use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::webhook::{
    AuthConfig, AuthType, DeliveryMetrics, Environment, KeyValueEntry, RetryPolicy, Webhook,
    WebhookStatus, WILDCARD_EVENT,
};

pub const SECRET_PREFIX: &str = "whsec_";
pub const ADMIN_OWNER_ID: &str = "user-admin";

/// Editable staging copy of a webhook, alive only while the editor is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookFormData {
    pub id: Option<String>,
    pub url: String,
    pub events: Vec<String>,
    pub status: WebhookStatus,
    pub description: String,
    pub secret: String,
    pub headers: Vec<KeyValueEntry>,
    pub auth_type: AuthType,
    pub auth_token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ssl_verification_enabled: bool,
    pub retry_policy: RetryPolicy,
    pub metadata: Vec<KeyValueEntry>,
    pub environment: Environment,
    pub tags: Vec<String>,
}

impl Default for WebhookFormData {
    fn default() -> Self {
        Self {
            id: None,
            url: String::new(),
            events: vec![WILDCARD_EVENT.to_string()],
            status: WebhookStatus::Active,
            description: String::new(),
            secret: String::new(),
            headers: Vec::new(),
            auth_type: AuthType::None,
            auth_token: None,
            username: None,
            password: None,
            ssl_verification_enabled: true,
            retry_policy: RetryPolicy::default(),
            metadata: Vec::new(),
            environment: Environment::Development,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryList {
    Headers,
    Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Key,
    Value,
}

/// A single change to an open draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Replace(WebhookFormData),
    AddEntry {
        list: EntryList,
        id: String,
    },
    ChangeEntry {
        list: EntryList,
        id: String,
        field: EntryField,
        value: String,
    },
    RemoveEntry {
        list: EntryList,
        id: String,
    },
}

/// Values a save needs that the draft itself cannot produce.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveStamp {
    pub id: String,
    pub secret: String,
    pub now: DateTime<Utc>,
}

impl SaveStamp {
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self {
            id: format!("wh-{}", hex::encode(rand::random::<[u8; 4]>())),
            secret: format!("{SECRET_PREFIX}{}", hex::encode(rand::random::<[u8; 16]>())),
            now,
        }
    }
}

impl WebhookFormData {
    /// The draft shown by "New Endpoint": one blank header row and one blank metadata row.
    pub fn blank(header_row_id: impl Into<String>, metadata_row_id: impl Into<String>) -> Self {
        Self {
            headers: vec![KeyValueEntry::blank(header_row_id)],
            metadata: vec![KeyValueEntry::blank(metadata_row_id)],
            ..Self::default()
        }
    }

    pub fn from_webhook(webhook: &Webhook) -> Self {
        let (auth_token, username, password) = match &webhook.auth_config {
            AuthConfig::None => (None, None, None),
            AuthConfig::Basic { username, password } => {
                (None, Some(username.clone()), Some(password.clone()))
            }
            AuthConfig::Bearer { token } => (Some(token.clone()), None, None),
        };

        Self {
            id: Some(webhook.id.clone()),
            url: webhook.url.clone(),
            events: webhook.events.clone(),
            status: webhook.status,
            description: webhook.description.clone(),
            secret: webhook.secret.clone(),
            headers: webhook.headers.clone(),
            auth_type: webhook.auth_config.auth_type(),
            auth_token,
            username,
            password,
            ssl_verification_enabled: webhook.ssl_verification_enabled,
            retry_policy: webhook.retry_policy.clone(),
            metadata: webhook
                .metadata
                .iter()
                .enumerate()
                .map(|(i, (k, v))| KeyValueEntry::new(format!("meta-{i}"), k.clone(), v.clone()))
                .collect(),
            environment: webhook.environment,
            tags: webhook.tags.clone(),
        }
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Replace(draft) => *self = draft,
            DraftEdit::AddEntry { list, id } => self.entries_mut(list).push(KeyValueEntry::blank(id)),
            DraftEdit::ChangeEntry {
                list,
                id,
                field,
                value,
            } => {
                if let Some(entry) = self.entries_mut(list).iter_mut().find(|e| e.id == id) {
                    match field {
                        EntryField::Key => entry.key = value,
                        EntryField::Value => entry.value = value,
                    }
                }
            }
            DraftEdit::RemoveEntry { list, id } => self.entries_mut(list).retain(|e| e.id != id),
        }
    }

    fn entries_mut(&mut self, list: EntryList) -> &mut Vec<KeyValueEntry> {
        match list {
            EntryList::Headers => &mut self.headers,
            EntryList::Metadata => &mut self.metadata,
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        match self.auth_type {
            AuthType::None => AuthConfig::None,
            AuthType::Basic => AuthConfig::Basic {
                username: self.username.clone().unwrap_or_default(),
                password: self.password.clone().unwrap_or_default(),
            },
            AuthType::Bearer => AuthConfig::Bearer {
                token: self.auth_token.clone().unwrap_or_default(),
            },
        }
    }

    /// Turn the draft into a webhook record.
    ///
    /// `existing` is the record being edited, if any. A new record gets the
    /// stamp's id and, when the draft has no secret, the stamp's secret. An
    /// edited record keeps its id, creation time, owner and last-send time.
    /// Metrics start from zero on every save.
    pub fn promote(self, existing: Option<&Webhook>, stamp: &SaveStamp) -> Webhook {
        let auth_config = self.auth_config();
        let headers = keyed_entries(&self.headers);
        let metadata = collapse_entries(&self.metadata);

        match existing {
            Some(prev) => Webhook {
                id: prev.id.clone(),
                url: self.url,
                status: self.status,
                events: self.events,
                description: self.description,
                secret: if self.secret.is_empty() {
                    prev.secret.clone()
                } else {
                    self.secret
                },
                created_at: prev.created_at,
                updated_at: stamp.now,
                last_event_sent_at: prev.last_event_sent_at,
                delivery_metrics: DeliveryMetrics::default(),
                retry_policy: self.retry_policy,
                headers,
                auth_config,
                ssl_verification_enabled: self.ssl_verification_enabled,
                metadata,
                owner_id: prev.owner_id.clone(),
                environment: self.environment,
                tags: self.tags,
            },
            None => Webhook {
                id: self.id.unwrap_or_else(|| stamp.id.clone()),
                url: self.url,
                status: self.status,
                events: self.events,
                description: self.description,
                secret: if self.secret.is_empty() {
                    stamp.secret.clone()
                } else {
                    self.secret
                },
                created_at: stamp.now,
                updated_at: stamp.now,
                last_event_sent_at: None,
                delivery_metrics: DeliveryMetrics::default(),
                retry_policy: self.retry_policy,
                headers,
                auth_config,
                ssl_verification_enabled: self.ssl_verification_enabled,
                metadata,
                owner_id: ADMIN_OWNER_ID.to_string(),
                environment: self.environment,
                tags: self.tags,
            },
        }
    }
}

/// Collapse ordered pairs into a map. Empty keys are skipped; a repeated key
/// keeps the value that appears last.
pub fn collapse_entries(entries: &[KeyValueEntry]) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for entry in entries.iter().filter(|e| !e.key.is_empty()) {
        map.insert(entry.key.clone(), entry.value.clone());
    }
    map
}

/// Drop rows whose key is empty.
pub fn keyed_entries(entries: &[KeyValueEntry]) -> Vec<KeyValueEntry> {
    entries.iter().filter(|e| !e.key.is_empty()).cloned().collect()
}
