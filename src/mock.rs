use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use uuid::Uuid;

use crate::models::form::SECRET_PREFIX;
use crate::models::{
    AttemptStatus, AuthConfig, DeliveryAttempt, DeliveryMetrics, Environment, EventStatus,
    KeyValueEntry, RetryPolicy, Webhook, WebhookEvent, WebhookStatus, WILDCARD_EVENT,
};

pub const EVENT_TYPES: [&str; 7] = [
    "transaction.created",
    "payment.updated",
    "user.created",
    "user.updated",
    "order.placed",
    "invoice.paid",
    "email.sent",
];

/// Event types used for events of a wildcard-subscribed webhook.
pub const WILDCARD_EVENT_TYPES: [&str; 4] = [
    "transaction.created",
    "payment.updated",
    "user.created",
    "order.placed",
];

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Every event whose zero-based position is a multiple of this is generated as failed.
const FORCED_FAILURE_STRIDE: usize = 8;

/// Synthesizes webhook and event records from an injected random source and clock.
pub struct MockGenerator<R = StdRng> {
    rng: R,
    now: DateTime<Utc>,
}

impl MockGenerator<StdRng> {
    pub fn seeded(seed: u64, now: DateTime<Utc>) -> Self {
        Self::new(StdRng::seed_from_u64(seed), now)
    }

    pub fn from_os_rng(now: DateTime<Utc>) -> Self {
        Self::new(StdRng::from_os_rng(), now)
    }
}

impl<R: Rng> MockGenerator<R> {
    pub fn new(rng: R, now: DateTime<Utc>) -> Self {
        Self { rng, now }
    }

    fn uuid(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.rng.random()).into_uuid()
    }

    fn hex_token(&mut self) -> String {
        self.uuid().simple().to_string()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.random_range(0..items.len())]
    }

    fn past(&mut self, max_ms: i64) -> DateTime<Utc> {
        self.now - TimeDelta::milliseconds(self.rng.random_range(0..max_ms))
    }

    pub fn generate_webhook(&mut self, index: usize) -> Webhook {
        let wanted = self.rng.random_range(1..=3);
        let mut events: Vec<String> = Vec::with_capacity(wanted);
        for _ in 0..wanted {
            let event = self.pick(&EVENT_TYPES).to_string();
            if !events.contains(&event) {
                events.push(event);
            }
        }
        if events.is_empty() {
            events.push(WILDCARD_EVENT.to_string());
        }

        let status = *self.pick(&WebhookStatus::ALL);
        let flavour = if self.rng.random_bool(0.5) {
            "critical"
        } else {
            "analytical"
        };
        let secret = format!("{SECRET_PREFIX}{}", self.hex_token());

        let auth_config = match self.rng.random_range(0..3) {
            0 => AuthConfig::None,
            1 => AuthConfig::Basic {
                username: format!("user-{index}"),
                password: "password123".to_string(),
            },
            _ => AuthConfig::Bearer {
                token: format!("sk_bearer_{}", self.hex_token()),
            },
        };

        let last_event_sent_at = if self.rng.random_bool(0.7) {
            Some(self.past(DAY_MS))
        } else {
            None
        };

        let headers = vec![
            KeyValueEntry::new(self.uuid().to_string(), "Content-Type", "application/json"),
            KeyValueEntry::new(
                self.uuid().to_string(),
                "X-Request-ID",
                format!("req-{}", self.uuid()),
            ),
        ];

        let mut metadata = BTreeMap::new();
        metadata.insert(
            "project".to_string(),
            format!("project-{}", self.rng.random_range(1..=3)),
        );
        metadata.insert(
            "cost_center".to_string(),
            format!("CC-{}", self.rng.random_range(0..100)),
        );

        let environment = if self.rng.random_bool(0.3) {
            Environment::Production
        } else if self.rng.random_bool(0.5) {
            Environment::Staging
        } else {
            Environment::Development
        };

        let tags = if self.rng.random_bool(0.5) {
            ["billing", "payments"]
        } else {
            ["analytics", "monitoring"]
        };

        Webhook {
            id: format!("wh-{index}"),
            url: format!("https://api.example.com/hooks/service-{index}"),
            status,
            events,
            description: format!("Webhook for {flavour} events related to service {index}."),
            secret,
            created_at: self.past(30 * DAY_MS),
            updated_at: self.now,
            last_event_sent_at,
            delivery_metrics: DeliveryMetrics {
                total_attempts: self.rng.random_range(0..1_000_000),
                successful_deliveries: self.rng.random_range(1_000..991_000),
                failed_deliveries: self.rng.random_range(0..5_000),
                avg_latency_ms: self.rng.random_range(50..350),
            },
            retry_policy: RetryPolicy {
                max_retries: self.rng.random_range(3..8),
                initial_interval_seconds: 60,
                multiplier: 2.0,
                max_interval_seconds: 3600,
            },
            headers,
            auth_config,
            ssl_verification_enabled: self.rng.random_bool(0.9),
            metadata,
            owner_id: format!("user-{}", self.rng.random_range(1..=5)),
            environment,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Generate one event for `webhook`. A wildcard (or empty) subscription
    /// draws its type from [`WILDCARD_EVENT_TYPES`].
    pub fn generate_event(
        &mut self,
        webhook: &Webhook,
        index: usize,
        force_failed: bool,
    ) -> WebhookEvent {
        let event_type = if webhook.is_wildcard() || webhook.events.is_empty() {
            self.pick(&WILDCARD_EVENT_TYPES).to_string()
        } else {
            self.pick(&webhook.events).clone()
        };

        let status = if force_failed || self.rng.random_bool(0.05) {
            EventStatus::Failed
        } else {
            EventStatus::Delivered
        };
        let timestamp = self.past(7 * DAY_MS);

        let attempt_count = match status {
            EventStatus::Failed => self.rng.random_range(1..=3),
            _ => 1,
        };
        let attempts: Vec<DeliveryAttempt> = (1..=attempt_count)
            .map(|attempt| self.generate_attempt(attempt, status, timestamp))
            .collect();

        let error = match status {
            EventStatus::Failed => attempts.last().and_then(|a| a.error_details.clone()),
            _ => None,
        };

        let payload_id = self.uuid().to_string();
        let user_id = self.uuid().to_string();
        let payload = json!({
            "id": format!("payload_{}", &payload_id[..8]),
            "amount": self.rng.random_range(0..10_000) as f64 / 100.0,
            "currency": "USD",
            "userId": format!("user_{}", &user_id[..6]),
            "timestamp": self.now.to_rfc3339(),
        });

        let external_ref = self.uuid().to_string()[..10].to_string();
        let mut metadata = BTreeMap::new();
        metadata.insert("correlationId".to_string(), self.uuid().to_string());

        WebhookEvent {
            id: format!("evt-{index}"),
            webhook_id: webhook.id.clone(),
            event_type,
            status,
            payload,
            error,
            timestamp,
            delivery_attempts: attempts,
            external_ref: Some(external_ref),
            metadata,
        }
    }

    fn generate_attempt(
        &mut self,
        attempt: u32,
        status: EventStatus,
        started: DateTime<Utc>,
    ) -> DeliveryAttempt {
        let outcome = if status == EventStatus::Delivered {
            AttemptStatus::Success
        } else {
            AttemptStatus::Failure
        };

        let (response_status, response_text, error_details) = match outcome {
            AttemptStatus::Success => (200, "OK", None),
            AttemptStatus::Failure => {
                let code = if self.rng.random_bool(0.5) { 500 } else { 408 };
                let text = if self.rng.random_bool(0.5) {
                    "Internal Server Error"
                } else {
                    "Gateway Timeout"
                };
                let detail = if self.rng.random_bool(0.5) {
                    "Connection refused"
                } else {
                    "SSL handshake failed"
                };
                (code, text, Some(detail.to_string()))
            }
        };

        DeliveryAttempt {
            attempt,
            status: outcome,
            response_status: Some(response_status),
            response_text: Some(response_text.to_string()),
            latency_ms: self.rng.random_range(100..600),
            timestamp: started + TimeDelta::seconds(10 * i64::from(attempt)),
            error_details,
        }
    }

    /// Build the startup population: webhooks `wh-1..=wh-N` and events
    /// `evt-1..=evt-M`, each event attributed to a random webhook.
    pub fn seed_population(
        &mut self,
        webhook_count: usize,
        event_count: usize,
    ) -> (Vec<Webhook>, Vec<WebhookEvent>) {
        let webhooks: Vec<Webhook> = (1..=webhook_count)
            .map(|i| self.generate_webhook(i))
            .collect();

        if webhooks.is_empty() {
            return (webhooks, Vec::new());
        }

        let events = (0..event_count)
            .map(|i| {
                let owner = self.rng.random_range(0..webhooks.len());
                self.generate_event(&webhooks[owner], i + 1, i % FORCED_FAILURE_STRIDE == 0)
            })
            .collect();

        (webhooks, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn same_seed_same_population() {
        let a = MockGenerator::seeded(7, now()).seed_population(15, 50);
        let b = MockGenerator::seeded(7, now()).seed_population(15, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn webhook_shape() {
        let mut generator = MockGenerator::seeded(1, now());
        for i in 1..=200 {
            let wh = generator.generate_webhook(i);
            assert_eq!(wh.id, format!("wh-{i}"));
            assert!(wh.url.ends_with(&format!("service-{i}")));
            assert!(!wh.events.is_empty());
            assert!(wh.events.len() <= 3);
            let mut unique = wh.events.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), wh.events.len());
            assert!(wh.secret.starts_with("whsec_"));
            assert_eq!(wh.secret.len(), 6 + 32);
            assert!(wh.created_at <= now());
            assert!(wh.created_at > now() - TimeDelta::days(30));
            assert!((3..8).contains(&wh.retry_policy.max_retries));
            assert!((50..350).contains(&wh.delivery_metrics.avg_latency_ms));
            assert_eq!(wh.headers.len(), 2);
            assert!(wh.metadata.contains_key("project"));
            assert!(wh.metadata.contains_key("cost_center"));
            if let AuthConfig::Basic { username, .. } = &wh.auth_config {
                assert_eq!(username, &format!("user-{i}"));
            }
        }
    }

    #[test]
    fn event_type_comes_from_subscription() {
        let mut generator = MockGenerator::seeded(3, now());
        let mut wh = generator.generate_webhook(1);
        wh.events = vec!["invoice.paid".to_string()];
        for i in 0..50 {
            let evt = generator.generate_event(&wh, i, false);
            assert_eq!(evt.event_type, "invoice.paid");
            assert_eq!(evt.webhook_id, "wh-1");
        }

        wh.events = vec![WILDCARD_EVENT.to_string()];
        for i in 0..50 {
            let evt = generator.generate_event(&wh, i, false);
            assert!(WILDCARD_EVENT_TYPES.contains(&evt.event_type.as_str()));
        }
    }

    #[test]
    fn forced_failure_has_failed_attempts() {
        let mut generator = MockGenerator::seeded(11, now());
        let wh = generator.generate_webhook(1);
        for i in 0..100 {
            let evt = generator.generate_event(&wh, i, true);
            assert_eq!(evt.status, EventStatus::Failed);
            assert!((1..=3).contains(&evt.delivery_attempts.len()));
            assert!(evt
                .delivery_attempts
                .iter()
                .all(|a| a.status == AttemptStatus::Failure && a.error_details.is_some()));
            assert_eq!(
                evt.error,
                evt.delivery_attempts.last().unwrap().error_details
            );
            for (n, attempt) in evt.delivery_attempts.iter().enumerate() {
                assert_eq!(attempt.attempt as usize, n + 1);
                assert_eq!(
                    attempt.timestamp,
                    evt.timestamp + TimeDelta::seconds(10 * (n as i64 + 1))
                );
            }
        }
    }

    #[test]
    fn delivered_event_has_single_success() {
        let mut generator = MockGenerator::seeded(5, now());
        let wh = generator.generate_webhook(1);
        let delivered: Vec<_> = (0..200)
            .map(|i| generator.generate_event(&wh, i, false))
            .filter(|e| e.status == EventStatus::Delivered)
            .collect();
        assert!(!delivered.is_empty());
        for evt in delivered {
            assert_eq!(evt.delivery_attempts.len(), 1);
            assert_eq!(evt.delivery_attempts[0].status, AttemptStatus::Success);
            assert_eq!(evt.delivery_attempts[0].response_status, Some(200));
            assert!(evt.error.is_none());
        }
    }

    #[test]
    fn population_forces_every_eighth_failure() {
        let (webhooks, events) = MockGenerator::seeded(42, now()).seed_population(15, 50);
        assert_eq!(webhooks.len(), 15);
        assert_eq!(events.len(), 50);
        for (i, evt) in events.iter().enumerate() {
            assert_eq!(evt.id, format!("evt-{}", i + 1));
            assert!(webhooks.iter().any(|w| w.id == evt.webhook_id));
            if i % 8 == 0 {
                assert_eq!(evt.status, EventStatus::Failed);
            }
        }
    }

    #[test]
    fn empty_population_has_no_events() {
        let (webhooks, events) = MockGenerator::seeded(1, now()).seed_population(0, 10);
        assert!(webhooks.is_empty());
        assert!(events.is_empty());
    }
}
