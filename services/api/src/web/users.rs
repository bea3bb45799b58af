//! services/api/src/web/users.rs
//!
//! Endpoints for reading and updating the caller's own profile.

use axum::{extract::State, Extension, Json};
use course_search_core::domain::Identity;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::web::extract::ApiJson;
use crate::web::protocol::{UpsertMeRequest, UserProfileBody};
use crate::web::state::AppState;

/// GET /v1/users/me - The caller's profile
#[utoipa::path(
    get,
    path = "/v1/users/me",
    responses(
        (status = 200, description = "The caller's profile", body = UserProfileBody),
        (status = 401, description = "Caller could not be identified")
    )
)]
pub async fn get_me_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserProfileBody>, ApiError> {
    let profile = state.profiles.get_or_create(&identity).await?;
    Ok(Json(profile.into()))
}

/// POST /v1/users/me - Merge fields into the caller's profile
#[utoipa::path(
    post,
    path = "/v1/users/me",
    request_body = UpsertMeRequest,
    responses(
        (status = 200, description = "The stored profile", body = UserProfileBody),
        (status = 401, description = "Caller could not be identified")
    )
)]
pub async fn upsert_me_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    ApiJson(req): ApiJson<UpsertMeRequest>,
) -> Result<Json<UserProfileBody>, ApiError> {
    let profile = state.profiles.upsert(&identity, req.into()).await?;
    info!(uid = %profile.uid, courses = profile.courses.len(), "Profile updated");
    Ok(Json(profile.into()))
}
