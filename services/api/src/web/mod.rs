pub mod documents;
pub mod extract;
pub mod middleware;
pub mod monitoring;
pub mod protocol;
pub mod rest;
pub mod search;
pub mod state;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

pub use extract::ApiJson;
pub use middleware::{require_auth, require_teacher};
pub use monitoring::{track_requests, RequestMetrics};
pub use state::AppState;

/// Builds the API router: public health route, authenticated reads, and
/// teacher-only writes, all behind request monitoring.
pub fn app_router(state: Arc<AppState>) -> Router {
    // Write routes (teacher role required)
    let teacher_routes = Router::new()
        .route(
            "/v1/courses/{course_id}/documents:batchCreate",
            post(documents::batch_create_handler),
        )
        .route(
            "/v1/courses/{course_id}/documents/{document_id}",
            patch(documents::update_document_handler).delete(documents::delete_document_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_teacher,
        ));

    // Read routes (any authenticated caller)
    let reader_routes = Router::new()
        .route(
            "/v1/courses/{course_id}/documents:search",
            post(search::search_course_handler),
        )
        .route(
            "/v1/courses/{course_id}/documents:ragSearch",
            post(search::rag_search_course_handler),
        )
        .route("/v1/documents:search", post(search::search_all_handler))
        .route("/v1/documents:ragSearch", post(search::rag_search_all_handler))
        .route(
            "/v1/users/me",
            get(users::get_me_handler).post(users::upsert_me_handler),
        );

    // Identity is resolved before the role check runs.
    let protected_routes = Router::new()
        .merge(teacher_routes)
        .merge(reader_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(rest::health_handler))
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            track_requests,
        ))
        .layer(monitoring::trace_layer())
        .with_state(state)
}
