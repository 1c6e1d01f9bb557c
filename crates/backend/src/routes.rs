use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::system::auth::middleware::require_auth;
use crate::system::middleware::request_logger::request_logger;
use crate::{handlers, system, AppState};

/// Routes that need a valid session
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // System auth routes (protected)
        .route("/api/auth/user", get(system::handlers::auth::current_user))
        .route(
            "/api/auth/profile",
            put(system::handlers::auth::update_profile),
        )
        // A001 Customer handlers
        .route(
            "/api/customers",
            get(handlers::a001_customer::list_all).post(handlers::a001_customer::create),
        )
        .route(
            "/api/customers/:id",
            get(handlers::a001_customer::get_by_id)
                .put(handlers::a001_customer::update)
                .delete(handlers::a001_customer::delete),
        )
        // A002 Measurement handlers
        .route(
            "/api/measurements",
            get(handlers::a002_measurement::list_all),
        )
        .route(
            "/api/measurements/:customer_id",
            get(handlers::a002_measurement::get_by_customer)
                .post(handlers::a002_measurement::add)
                .put(handlers::a002_measurement::update)
                .delete(handlers::a002_measurement::delete),
        )
        // A003 Order handlers
        .route(
            "/api/orders",
            get(handlers::a003_order::list_all).post(handlers::a003_order::create),
        )
        .route("/api/orders/sales", get(handlers::a003_order::sales))
        .route("/api/orders/:id", get(handlers::a003_order::get_by_id))
        .route(
            "/api/orders/:id/status",
            put(handlers::a003_order::update_status),
        )
        // A004 Expense handlers
        .route(
            "/api/expenses",
            get(handlers::a004_expense::list_all).post(handlers::a004_expense::create),
        )
        .route(
            "/api/expenses/:id",
            get(handlers::a004_expense::get_by_id).put(handlers::a004_expense::update),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route("/api/auth/signup", post(system::handlers::auth::signup))
        .route("/api/auth/login", post(system::handlers::auth::login))
        .route("/api/auth/logout", post(system::handlers::auth::logout))
        .merge(protected_routes(&state));

    if let Some(dir) = state.config.server.static_dir.as_deref() {
        tracing::info!("Serving static files from {}", dir);
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(middleware::from_fn(request_logger))
        .layer(cors_layer(&state))
        .with_state(state)
}
