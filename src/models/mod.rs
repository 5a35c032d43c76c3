pub mod event;
pub mod extensions;
pub mod form;
pub mod webhook;

pub use event::{AttemptStatus, DeliveryAttempt, EventStatus, WebhookEvent};
pub use form::{DraftEdit, EntryField, EntryList, SaveStamp, WebhookFormData};
pub use webhook::{
    AuthConfig, AuthType, DeliveryMetrics, Environment, KeyValueEntry, RetryPolicy, Webhook,
    WebhookStatus, WILDCARD_EVENT,
};
