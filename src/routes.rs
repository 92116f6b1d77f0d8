use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{self, donors, requests};
use crate::middleware::{require_admin, require_auth};
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(donor_routes(&state))
        .merge(request_routes(&state))
        .fallback(handlers::fallback)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&config.security) {
        app = app.layer(cors);
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn donor_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/donors", post(donors::create).get(donors::list))
        .route("/donors/search", get(donors::search))
        .route("/donors/:id", put(donors::update));

    // GET takes an email in the same path position the PATCH uses for the id
    let authenticated = Router::new()
        .route("/donors/:id/role", get(donors::role_lookup))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let admin = Router::new()
        .route("/donors/:id/status", patch(donors::set_status))
        .route("/donors/:id/role", patch(donors::set_role))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    public.merge(authenticated).merge(admin)
}

fn request_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/requests", post(requests::create).get(requests::list))
        .route("/requests/pending", get(requests::pending))
        .route(
            "/requests/:id",
            get(requests::get)
                .put(requests::replace)
                .patch(requests::assign)
                .delete(requests::delete),
        );

    let authenticated = Router::new()
        .route("/requests/latest", get(requests::latest))
        .route("/requests/:id/status", patch(requests::set_status))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let admin = Router::new()
        .route("/requests/all", get(requests::all))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    public.merge(authenticated).merge(admin)
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
