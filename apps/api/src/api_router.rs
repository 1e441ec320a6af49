use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let bootstrap_routes = Router::new()
        .route(
            "/api/bootstrap/state",
            get(handlers::bootstrap::bootstrap_state_handler),
        )
        .route(
            "/api/bootstrap/execute",
            post(handlers::bootstrap::execute_bootstrap_handler),
        )
        .route(
            "/api/bootstrap/users",
            post(handlers::bootstrap::initialize_users_handler),
        )
        .route(
            "/api/bootstrap/organizations",
            post(handlers::bootstrap::initialize_organizations_handler),
        )
        .route(
            "/api/bootstrap/reset",
            post(handlers::bootstrap::reset_bootstrap_handler),
        )
        .route(
            "/api/bootstrap/mode",
            put(handlers::bootstrap::set_mode_handler),
        )
        .route(
            "/api/bootstrap/backups",
            get(handlers::bootstrap::list_backups_handler)
                .post(handlers::bootstrap::create_backup_handler),
        )
        .route(
            "/api/bootstrap/backups/{key}/restore",
            post(handlers::bootstrap::restore_backup_handler),
        )
        .route(
            "/api/bootstrap/validation",
            get(handlers::bootstrap::validation_handler),
        )
        .route(
            "/api/bootstrap/policies/compile",
            post(handlers::bootstrap::compile_policies_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_bootstrap_token,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(bootstrap_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
