//! Google login and the admin gate

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

const MAX_GATE_BODY_BYTES: usize = 1024 * 1024;

/// POST /api/auth/google
///
/// Verifies the Google ID token, upserts the user, and returns a
/// session JWT alongside the profile.
pub async fn google_login(
    State(state): State<AppState>,
    Json(req): Json<GoogleLoginRequest>,
) -> Result<Json<GoogleLoginResponse>> {
    let profile = state.google.verify(&req.token).await?;

    let user = state
        .db
        .upsert_google_user(
            &profile.sub,
            profile.name.as_deref(),
            profile.email.as_deref(),
            profile.picture.as_deref(),
        )
        .await?;

    let token = state.jwt.issue(&user)?;

    tracing::info!(google_id = %user.google_id, "user logged in");
    Ok(Json(GoogleLoginResponse {
        user: AuthUser::from(&user),
        token,
    }))
}

/// Admin gate over `/api/admin`.
///
/// GET requests and multipart uploads pass through. Every other request
/// must carry a JSON body with a `google_id` belonging to an admin user.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if request.method() == Method::GET || is_multipart(&request) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_GATE_BODY_BYTES)
        .await
        .map_err(|_| ApiError::BadRequest("Request body too large".to_string()))?;

    let google_id = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|v| v.get("google_id").and_then(|g| g.as_str()).map(String::from))
        .ok_or_else(|| ApiError::Unauthorized("Missing google_id".to_string()))?;

    let user = state
        .db
        .get_user_by_google_id(&google_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}
