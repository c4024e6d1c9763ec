use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/habits",
            get(handlers::list_habits)
                .post(handlers::add_habit)
                .delete(handlers::clear_habits),
        )
        .route("/api/habits/:id", delete(handlers::delete_habit))
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/stats/weekly", get(handlers::get_weekly))
        .route("/api/stats/monthly", get(handlers::get_monthly))
        .route("/api/stats/categories", get(handlers::get_categories))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/export", get(handlers::export_snapshot))
        .route("/api/import", post(handlers::import_snapshot))
        .with_state(state)
}
