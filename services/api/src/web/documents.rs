//! services/api/src/web/documents.rs
//!
//! Write endpoints for course document chunks. Teacher-only; the role check
//! is applied as a route layer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::extract::ApiJson;
use crate::web::protocol::{
    BatchCreateRequest, BatchCreateResponse, DocumentChunkBody, UpdateDocumentRequest,
};
use crate::web::state::AppState;

/// POST /v1/courses/{course_id}/documents:batchCreate - Index a batch of chunks
#[utoipa::path(
    post,
    path = "/v1/courses/{course_id}/documents:batchCreate",
    request_body = BatchCreateRequest,
    params(("course_id" = String, Path, description = "The owning course.")),
    responses(
        (status = 200, description = "Chunks stored and indexed", body = BatchCreateResponse),
        (status = 403, description = "Caller is not a teacher"),
        (status = 422, description = "Invalid chunk payload")
    )
)]
pub async fn batch_create_handler(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    ApiJson(req): ApiJson<BatchCreateRequest>,
) -> Result<Json<BatchCreateResponse>, ApiError> {
    // Validate the whole batch before any of it is indexed.
    let chunks = req
        .documents
        .into_iter()
        .map(|payload| payload.into_new_chunk())
        .collect::<Result<Vec<_>, _>>()?;

    let stored = state
        .with_retrieval(move |retrieval| retrieval.batch_create(&course_id, chunks))
        .await?;

    Ok(Json(BatchCreateResponse {
        documents: stored.into_iter().map(DocumentChunkBody::from).collect(),
    }))
}

/// PATCH /v1/courses/{course_id}/documents/{document_id} - Partially update a chunk
#[utoipa::path(
    patch,
    path = "/v1/courses/{course_id}/documents/{document_id}",
    request_body = UpdateDocumentRequest,
    params(
        ("course_id" = String, Path, description = "The owning course."),
        ("document_id" = String, Path, description = "The chunk to update.")
    ),
    responses(
        (status = 200, description = "Updated chunk", body = DocumentChunkBody),
        (status = 403, description = "Caller is not a teacher"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn update_document_handler(
    State(state): State<Arc<AppState>>,
    Path((course_id, document_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<UpdateDocumentRequest>,
) -> Result<Json<DocumentChunkBody>, ApiError> {
    let patch = req.into_patch()?;
    let updated = state
        .with_retrieval(move |retrieval| retrieval.update(&course_id, &document_id, patch))
        .await??;
    Ok(Json(updated.into()))
}

/// DELETE /v1/courses/{course_id}/documents/{document_id} - Remove a chunk
#[utoipa::path(
    delete,
    path = "/v1/courses/{course_id}/documents/{document_id}",
    params(
        ("course_id" = String, Path, description = "The owning course."),
        ("document_id" = String, Path, description = "The chunk to delete.")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Caller is not a teacher"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn delete_document_handler(
    State(state): State<Arc<AppState>>,
    Path((course_id, document_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .with_retrieval(move |retrieval| retrieval.delete(&course_id, &document_id))
        .await??;
    Ok(StatusCode::NO_CONTENT)
}
