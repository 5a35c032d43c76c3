pub mod analysis;
pub mod events;
pub mod webhooks;

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::listing::FilterOptions;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
}

impl ListParams {
    pub fn filters(&self) -> FilterOptions {
        FilterOptions {
            search_term: self.search.clone(),
            status: self.status.clone(),
        }
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Webhooks
        .route(
            "/api/v1/webhooks",
            get(webhooks::list).post(webhooks::create),
        )
        .route(
            "/api/v1/webhooks/{id}",
            get(webhooks::get)
                .put(webhooks::update)
                .delete(webhooks::delete),
        )
        // Events
        .route("/api/v1/events", get(events::list))
        .route("/api/v1/events/{id}", get(events::get))
        .route("/api/v1/overview", get(events::overview))
        // Failure analysis
        .route("/api/v1/events/{id}/analysis", post(analysis::start))
        .route(
            "/api/v1/analysis",
            get(analysis::current).delete(analysis::dismiss),
        )
}
