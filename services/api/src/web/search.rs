//! services/api/src/web/search.rs
//!
//! Search endpoints: course-scoped and cross-course, each in a snippet flavour
//! for result lists and a full-content flavour for RAG prompts.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use course_search_core::access::Principal;
use course_search_core::domain::Identity;
use course_search_core::retrieval::{HitView, SearchHit};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::extract::ApiJson;
use crate::web::protocol::{RagSearchResponse, SearchRequest, SearchResponse};
use crate::web::state::AppState;

async fn course_hits(
    state: &AppState,
    course_id: String,
    req: &SearchRequest,
    view: HitView,
) -> Result<Vec<SearchHit>, ApiError> {
    req.validate()?;
    let (query, page_size) = (req.query.clone(), req.page_size);
    state
        .with_retrieval(move |retrieval| {
            retrieval.search_course(&course_id, &query, page_size, view)
        })
        .await
}

async fn cross_course_hits(
    state: &AppState,
    identity: &Identity,
    req: &SearchRequest,
    view: HitView,
) -> Result<Vec<SearchHit>, ApiError> {
    req.validate()?;
    let profile = state.profiles.get_or_create(identity).await?;
    let principal = Principal::new(identity, &profile);
    let (query, page_size) = (req.query.clone(), req.page_size);
    Ok(state
        .with_retrieval(move |retrieval| {
            retrieval.search_all_courses(&principal, &query, page_size, view)
        })
        .await??)
}

fn search_response(req: SearchRequest, hits: Vec<SearchHit>) -> SearchResponse {
    SearchResponse {
        query: req.query,
        mode: req.mode,
        results: hits.into_iter().map(Into::into).collect(),
        next_page_token: None,
    }
}

fn rag_response(req: SearchRequest, hits: Vec<SearchHit>) -> RagSearchResponse {
    RagSearchResponse {
        query: req.query,
        mode: req.mode,
        results: hits.into_iter().map(Into::into).collect(),
    }
}

/// POST /v1/courses/{course_id}/documents:search - Full-text search within a course
#[utoipa::path(
    post,
    path = "/v1/courses/{course_id}/documents:search",
    request_body = SearchRequest,
    params(("course_id" = String, Path, description = "The course to search.")),
    responses(
        (status = 200, description = "Ranked results with snippets", body = SearchResponse),
        (status = 422, description = "Invalid search request")
    )
)]
pub async fn search_course_handler(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let hits = course_hits(&state, course_id, &req, HitView::Snippet).await?;
    Ok(Json(search_response(req, hits)))
}

/// POST /v1/courses/{course_id}/documents:ragSearch - Course search returning full content
#[utoipa::path(
    post,
    path = "/v1/courses/{course_id}/documents:ragSearch",
    request_body = SearchRequest,
    params(("course_id" = String, Path, description = "The course to search.")),
    responses(
        (status = 200, description = "Ranked results with full content", body = RagSearchResponse),
        (status = 422, description = "Invalid search request")
    )
)]
pub async fn rag_search_course_handler(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> Result<Json<RagSearchResponse>, ApiError> {
    let hits = course_hits(&state, course_id, &req, HitView::FullContent).await?;
    Ok(Json(rag_response(req, hits)))
}

/// POST /v1/documents:search - Search every course visible to the caller
#[utoipa::path(
    post,
    path = "/v1/documents:search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Ranked results with snippets", body = SearchResponse),
        (status = 403, description = "Student has not selected any courses"),
        (status = 422, description = "Invalid search request")
    )
)]
pub async fn search_all_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let hits = cross_course_hits(&state, &identity, &req, HitView::Snippet).await?;
    Ok(Json(search_response(req, hits)))
}

/// POST /v1/documents:ragSearch - Cross-course search returning full content
#[utoipa::path(
    post,
    path = "/v1/documents:ragSearch",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Ranked results with full content", body = RagSearchResponse),
        (status = 403, description = "Student has not selected any courses"),
        (status = 422, description = "Invalid search request")
    )
)]
pub async fn rag_search_all_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> Result<Json<RagSearchResponse>, ApiError> {
    let hits = cross_course_hits(&state, &identity, &req, HitView::FullContent).await?;
    Ok(Json(rag_response(req, hits)))
}
