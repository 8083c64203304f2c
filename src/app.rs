use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/users/:id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/users/:id/streak", get(handlers::get_streak))
        .route("/users/:id/weekly-report", get(handlers::get_weekly_report))
        .route("/users/:id/today", get(handlers::get_today))
        .route("/users/:id/calendar", get(handlers::get_calendar))
        .route("/walks", post(handlers::create_walk))
        .route(
            "/walks/:id",
            get(handlers::get_walk)
                .put(handlers::update_walk)
                .delete(handlers::delete_walk),
        )
        .route("/walks/user/:user_id", get(handlers::list_user_walks))
        .route("/walks/user/:user_id/stats", get(handlers::get_walk_stats))
        .with_state(state)
}
