use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use brokerly_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/properties",
            post(handlers::properties::register_property_handler),
        )
        .route(
            "/api/properties/{property_id}",
            get(handlers::properties::get_property_handler),
        )
        .route(
            "/api/properties/{property_id}/approval",
            get(handlers::approvals::approval_status_handler)
                .post(handlers::approvals::start_approval_handler),
        )
        .route(
            "/api/properties/{property_id}/approval/decision",
            post(handlers::approvals::decide_approval_handler),
        )
        .route(
            "/api/properties/{property_id}/approve",
            post(handlers::approvals::approve_property_handler),
        )
        .route(
            "/api/properties/{property_id}/reject",
            post(handlers::approvals::reject_property_handler),
        )
        .route(
            "/api/properties/{property_id}/history",
            get(handlers::approvals::property_history_handler),
        )
        .route(
            "/api/approvals/pending",
            get(handlers::approvals::pending_approvals_handler),
        )
        .route_layer(from_fn(middleware::require_actor));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
