use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{bookings, courts, health, schedules};
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors_allow_any = state.config.cors_allow_any;

    let router = Router::new()
        .route("/health", get(health::health))
        .route("/courts", get(courts::list_courts).post(courts::create_court))
        .route(
            "/courts/:id",
            get(courts::get_court)
                .put(courts::update_court)
                .delete(courts::delete_court),
        )
        .route(
            "/schedules",
            get(schedules::list_schedules).post(schedules::create_schedule),
        )
        .route("/schedules/populate", post(schedules::populate_schedules))
        .route(
            "/schedules/:id",
            get(schedules::get_schedule)
                .put(schedules::update_schedule)
                .delete(schedules::delete_schedule),
        )
        .route(
            "/schedules/:id/availability",
            get(schedules::schedule_availability),
        )
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/bookings/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_allow_any {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
