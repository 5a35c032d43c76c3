pub mod dashboard;
pub mod editor;
pub mod endpoints;
pub mod events;
pub mod widgets;

use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Console shell
        .route("/", get(dashboard::index))
        .route("/ui/tab", post(dashboard::select_tab))
        // Endpoints
        .route("/ui/endpoints/filter", post(endpoints::filter))
        .route("/ui/endpoints/page", post(endpoints::page))
        .route("/ui/endpoints/new", post(endpoints::new_webhook))
        .route("/ui/endpoints/{id}/configure", post(endpoints::configure))
        .route("/ui/endpoints/{id}/delete", post(endpoints::delete))
        .route("/ui/editor", post(endpoints::submit_editor))
        // Events
        .route("/ui/events/filter", post(events::filter))
        .route("/ui/events/page", post(events::page))
        .route("/ui/events/{id}/open", post(events::open))
        .route("/ui/events/close", post(events::close))
        .route("/ui/analysis", post(events::analyze))
        // HTMX partials
        .route("/htmx/analysis", get(events::analysis_partial))
}

/// Every console action re-renders the shell.
pub(crate) fn back_to_console() -> Redirect {
    Redirect::to("/")
}
