pub mod config;
pub mod error;
pub mod state;
pub mod models;
pub mod mock;
pub mod listing;
pub mod store;
pub mod analysis;
pub mod routes;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use chrono::Utc;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::analysis::gemini::GeminiAnalyzer;
use crate::analysis::FailureAnalyzer;
use crate::config::Config;
use crate::mock::MockGenerator;
use crate::state::{AppState, SharedState};
use crate::store::{DashboardState, Store};

pub fn build_app(config: Config) -> (Router, SharedState) {
    if config.ai.api_key.is_none() {
        tracing::warn!("HOOKBOARD_AI_API_KEY is not set; failure analysis will report an error");
    }
    let analyzer = Arc::new(GeminiAnalyzer::new(&config.ai));
    build_app_with(config, analyzer)
}

/// Same as [`build_app`] with a caller-chosen analysis backend.
pub fn build_app_with(
    config: Config,
    analyzer: Arc<dyn FailureAnalyzer>,
) -> (Router, SharedState) {
    let now = Utc::now();
    let (webhooks, events) = match config.mock.seed {
        Some(seed) => MockGenerator::seeded(seed, now),
        None => MockGenerator::from_os_rng(now),
    }
    .seed_population(config.mock.webhooks, config.mock.events);

    tracing::info!(
        "Generated {} webhooks and {} events (analysis via {})",
        webhooks.len(),
        events.len(),
        analyzer.name()
    );

    let store = Store::new(DashboardState::new(webhooks, events), analyzer);
    let state: SharedState = Arc::new(AppState { config, store });

    // Security headers
    let app = Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes())
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisError;
    use crate::config::{AiConfig, MockConfig};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    struct Unused;

    #[async_trait]
    impl FailureAnalyzer for Unused {
        fn name(&self) -> &str {
            "unused"
        }

        async fn analyze(&self, _prompt: &str) -> Result<String, AnalysisError> {
            Err(AnalysisError::from("not available"))
        }
    }

    fn config() -> Config {
        Config {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            log_level: "warn".to_string(),
            mock: MockConfig {
                seed: Some(11),
                ..MockConfig::default()
            },
            ai: AiConfig {
                api_key: None,
                model: "test".to_string(),
                base_url: "http://127.0.0.1:9".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn health_carries_security_headers() {
        let (app, _) = build_app_with(config(), Arc::new(Unused));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
    }

    #[tokio::test]
    async fn population_follows_config() {
        let (_, state) = build_app_with(config(), Arc::new(Unused));
        let (webhooks, events) = state
            .store
            .read(|s| (s.webhooks.len(), s.events.len()))
            .await;
        assert_eq!(webhooks, 15);
        assert_eq!(events, 50);
    }

    #[tokio::test]
    async fn console_actions_redirect_to_rendered_shell() {
        let (app, _) = build_app_with(config(), Arc::new(Unused));
        let response = app
            .clone()
            .oneshot(
                Request::post("/ui/tab")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("tab=endpoints"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
