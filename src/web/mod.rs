pub mod handlers;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use chrono_tz::Tz;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::RosterHandle;
use handlers::{
    current_week_handler, edit_shift_handler, get_week_handler, health_handler,
    init_week_handler, list_weeks_handler, put_week_handler, report_handler, set_revenue_handler,
    staff_handler, wage_handler,
};

#[derive(Clone)]
pub struct AppState {
    /// Roster service
    pub roster: RosterHandle,
    /// Timezone used to find the current week
    pub timezone: Tz,
}

/// Build the JSON API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/staff", get(staff_handler))
        .route("/api/wage", post(wage_handler))
        .route("/api/weeks", get(list_weeks_handler))
        .route("/api/weeks/current", get(current_week_handler))
        .route("/api/weeks/{date}", get(get_week_handler).put(put_week_handler))
        .route("/api/weeks/{date}/init", post(init_week_handler))
        .route("/api/weeks/{date}/shifts", patch(edit_shift_handler))
        .route("/api/weeks/{date}/revenue/{weekday}", put(set_revenue_handler))
        .route("/api/weeks/{date}/report", get(report_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
