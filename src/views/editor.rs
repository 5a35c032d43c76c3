use crate::models::{
    AuthType, EntryList, Environment, KeyValueEntry, RetryPolicy, WebhookFormData, WebhookStatus,
};

/// What the editor's submit button asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorOp {
    Save,
    Cancel,
    AddEntry(EntryList),
    RemoveEntry(EntryList, String),
    /// Keep the typed values without doing anything else.
    Refresh,
}

impl EditorOp {
    fn parse(op: &str) -> Self {
        match op.split_once(':') {
            Some(("remove_header", id)) => Self::RemoveEntry(EntryList::Headers, id.to_string()),
            Some(("remove_meta", id)) => Self::RemoveEntry(EntryList::Metadata, id.to_string()),
            _ => match op {
                "save" => Self::Save,
                "cancel" => Self::Cancel,
                "add_header" => Self::AddEntry(EntryList::Headers),
                "add_meta" => Self::AddEntry(EntryList::Metadata),
                _ => Self::Refresh,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorSubmission {
    pub draft: WebhookFormData,
    pub op: EditorOp,
}

/// Decode the editor form. Repeated `header_*` / `meta_*` fields are read in
/// order; numbers that do not parse keep the value from `base`.
pub fn parse_editor_form(body: &[u8], base: &WebhookFormData) -> EditorSubmission {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(body).into_owned().collect();

    let single = |name: &str| -> Option<&str> {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };
    let text = |name: &str| single(name).unwrap_or_default().to_string();
    let optional = |name: &str| single(name).filter(|v| !v.is_empty()).map(str::to_string);
    let many = |name: &str| -> Vec<&str> {
        pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    };
    let entries = |prefix: &str| -> Vec<KeyValueEntry> {
        let ids = many(&format!("{prefix}_id"));
        let keys = many(&format!("{prefix}_key"));
        let values = many(&format!("{prefix}_value"));
        ids.iter()
            .zip(keys.iter())
            .zip(values.iter())
            .map(|((id, key), value)| KeyValueEntry::new(*id, *key, *value))
            .collect()
    };

    let base_retry = &base.retry_policy;
    let retry_policy = RetryPolicy {
        max_retries: parse_or(single("max_retries"), base_retry.max_retries),
        initial_interval_seconds: parse_or(
            single("initial_interval_seconds"),
            base_retry.initial_interval_seconds,
        ),
        multiplier: parse_or(single("multiplier"), base_retry.multiplier),
        max_interval_seconds: parse_or(
            single("max_interval_seconds"),
            base_retry.max_interval_seconds,
        ),
    };

    let draft = WebhookFormData {
        id: optional("id"),
        url: text("url"),
        events: split_list(&text("events")),
        status: single("status")
            .and_then(WebhookStatus::parse)
            .unwrap_or(base.status),
        description: text("description"),
        secret: text("secret"),
        headers: entries("header"),
        auth_type: single("auth_type")
            .and_then(AuthType::parse)
            .unwrap_or(base.auth_type),
        auth_token: optional("auth_token"),
        username: optional("username"),
        password: optional("password"),
        ssl_verification_enabled: single("ssl_verification_enabled").is_some(),
        retry_policy,
        metadata: entries("meta"),
        environment: single("environment")
            .and_then(Environment::parse)
            .unwrap_or(base.environment),
        tags: split_list(&text("tags")),
    };

    EditorSubmission {
        draft,
        op: EditorOp::parse(single("op").unwrap_or_default()),
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, fallback: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(fallback)
}

/// Comma separated list, blanks dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(pairs: &[(&str, &str)]) -> Vec<u8> {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
            .into_bytes()
    }

    #[test]
    fn full_form_round_trip() {
        let body = encode(&[
            ("id", "wh-4"),
            ("url", "https://hooks.example.com/in"),
            ("description", "Orders"),
            ("status", "Paused"),
            ("events", "order.placed, invoice.paid,"),
            ("secret", ""),
            ("auth_type", "basic"),
            ("username", "ops"),
            ("password", "hunter2"),
            ("auth_token", ""),
            ("ssl_verification_enabled", "on"),
            ("max_retries", "7"),
            ("initial_interval_seconds", "30"),
            ("multiplier", "1.5"),
            ("max_interval_seconds", "600"),
            ("environment", "staging"),
            ("tags", "billing , core"),
            ("header_id", "h1"),
            ("header_key", "X-One"),
            ("header_value", "1"),
            ("header_id", "h2"),
            ("header_key", ""),
            ("header_value", "dropped later"),
            ("meta_id", "m1"),
            ("meta_key", "team"),
            ("meta_value", "payments"),
            ("op", "save"),
        ]);

        let parsed = parse_editor_form(&body, &WebhookFormData::default());
        assert_eq!(parsed.op, EditorOp::Save);

        let draft = parsed.draft;
        assert_eq!(draft.id.as_deref(), Some("wh-4"));
        assert_eq!(draft.status, WebhookStatus::Paused);
        assert_eq!(draft.events, vec!["order.placed", "invoice.paid"]);
        assert_eq!(draft.auth_type, AuthType::Basic);
        assert_eq!(draft.username.as_deref(), Some("ops"));
        assert!(draft.auth_token.is_none());
        assert!(draft.ssl_verification_enabled);
        assert_eq!(draft.retry_policy.max_retries, 7);
        assert_eq!(draft.retry_policy.multiplier, 1.5);
        assert_eq!(draft.environment, Environment::Staging);
        assert_eq!(draft.tags, vec!["billing", "core"]);
        assert_eq!(
            draft.headers,
            vec![
                KeyValueEntry::new("h1", "X-One", "1"),
                KeyValueEntry::new("h2", "", "dropped later"),
            ]
        );
        assert_eq!(draft.metadata, vec![KeyValueEntry::new("m1", "team", "payments")]);
    }

    #[test]
    fn missing_checkbox_disables_tls_and_bad_numbers_fall_back() {
        let base = WebhookFormData::default();
        let body = encode(&[("url", "x"), ("max_retries", "lots"), ("op", "add_header")]);
        let parsed = parse_editor_form(&body, &base);
        assert_eq!(parsed.op, EditorOp::AddEntry(EntryList::Headers));
        assert!(!parsed.draft.ssl_verification_enabled);
        assert_eq!(parsed.draft.retry_policy, base.retry_policy);
        assert!(parsed.draft.id.is_none());
        assert!(parsed.draft.events.is_empty());
    }

    #[test]
    fn remove_ops_carry_row_id() {
        let body = encode(&[("op", "remove_meta:m-7")]);
        let parsed = parse_editor_form(&body, &WebhookFormData::default());
        assert_eq!(
            parsed.op,
            EditorOp::RemoveEntry(EntryList::Metadata, "m-7".to_string())
        );
        let body = encode(&[("op", "cancel")]);
        assert_eq!(
            parse_editor_form(&body, &WebhookFormData::default()).op,
            EditorOp::Cancel
        );
    }
}
