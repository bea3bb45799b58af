//! services/api/src/web/middleware.rs
//!
//! Authentication and role-check middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use course_search_core::domain::{Identity, Role};
use course_search_core::ports::{Credentials, PortError};
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::web::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Middleware that resolves the caller through the identity provider.
///
/// If resolved, inserts the `Identity` into request extensions for handlers to use.
/// Otherwise returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Lift the raw claims off the request
    let credentials = Credentials {
        user_id: header_str(req.headers(), USER_ID_HEADER),
        role: header_str(req.headers(), USER_ROLE_HEADER),
    };

    // 2. Let the identity provider decide who is calling
    let identity = state.identity.identify(&credentials).await?;

    // 3. Insert the identity into request extensions
    req.extensions_mut().insert(identity);

    // 4. Continue to the handler
    Ok(next.run(req).await)
}

/// Middleware admitting only teachers. Must run after [`require_auth`].
pub async fn require_teacher(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .ok_or(PortError::Unauthorized)?;

    if identity.role != Role::Teacher && !state.config.auth_bypass {
        warn!(uid = %identity.uid, "Write rejected: caller is not a teacher");
        return Err(PortError::Forbidden("Teacher role required".to_string()).into());
    }

    Ok(next.run(req).await)
}
