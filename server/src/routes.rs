//! Router configuration.

use crate::api::{auth, movies, reservations};
use crate::health::{health_check, readiness_check};
use crate::state::AppState;
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use cinebook_web::correlation_id_layer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the complete Axum router.
///
/// Routes:
/// - Health checks (public)
/// - Authentication (public)
/// - Movie catalog proxy (public)
/// - Reservations (bearer token)
///
/// An empty `cors_origins` list allows any origin.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Reservations
        .route("/reservation", post(reservations::create_reservation))
        .route(
            "/reservation/:id",
            get(reservations::list_user_reservations).delete(reservations::delete_reservation),
        )
        // Movie catalog
        .route("/movies", get(movies::discover))
        .route("/movie/now_playing", get(movies::now_playing))
        .route("/movie/:movie_id", get(movies::movie))
        .route("/search/movie", get(movies::search))
        .route("/genre/movie/list", get(movies::genres))
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
