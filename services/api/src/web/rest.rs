//! services/api/src/web/rest.rs
//!
//! Contains the service health handler and the master definition for the
//! OpenAPI specification.

use axum::{extract::State, Json};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::web::protocol::{
    BatchCreateRequest, BatchCreateResponse, DocumentChunkBody, DocumentChunkPayload,
    HealthResponse, RagSearchResponse, RagSearchResultItem, RoleBody, SearchMode, SearchRequest,
    SearchResponse, SearchResultItem, UpdateDocumentRequest, UpsertMeRequest, UserProfileBody,
};
use crate::web::state::AppState;
use crate::web::{documents, search, users};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        documents::batch_create_handler,
        documents::update_document_handler,
        documents::delete_document_handler,
        search::search_course_handler,
        search::rag_search_course_handler,
        search::search_all_handler,
        search::rag_search_all_handler,
        users::get_me_handler,
        users::upsert_me_handler,
    ),
    components(
        schemas(
            BatchCreateRequest,
            BatchCreateResponse,
            DocumentChunkPayload,
            DocumentChunkBody,
            UpdateDocumentRequest,
            SearchMode,
            SearchRequest,
            SearchResponse,
            SearchResultItem,
            RagSearchResponse,
            RagSearchResultItem,
            RoleBody,
            UserProfileBody,
            UpsertMeRequest,
            HealthResponse,
        )
    ),
    tags(
        (name = "Course Search API", description = "Lexical search over course document chunks.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Health
//=========================================================================================

/// GET /health - Liveness, index sizes and request counters
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let registry = state.retrieval.registry();
    let metrics = state.metrics.snapshot();
    Json(HealthResponse {
        status: "ok".to_string(),
        courses: registry.course_ids().len(),
        global_documents: registry.global().len(),
        requests: metrics.requests,
        client_errors: metrics.client_errors,
        server_errors: metrics.server_errors,
    })
}
