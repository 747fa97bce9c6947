use crate::handlers;
use crate::tracker::Tracker;
use axum::{routing::{get, post}, Router};

pub fn router(tracker: Tracker) -> Router {
    Router::new()
        .route("/api/state", get(handlers::get_state))
        .route("/api/today", get(handlers::get_today))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/mood", post(handlers::set_mood))
        .route("/api/view", post(handlers::change_view))
        .route("/api/month", post(handlers::change_month))
        .route(
            "/api/config",
            get(handlers::get_config).put(handlers::save_config),
        )
        .route("/api/sync", post(handlers::sync_now))
        .with_state(tracker)
}
