//! Contact form route

use axum::{extract::State, http::StatusCode, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/contact
pub async fn submit_message(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactMessage>)> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.message.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Name, email, and message are required".to_string(),
        ));
    }

    let stored = state
        .db
        .insert_contact_message(req.name.trim(), req.email.trim(), req.message.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(stored)))
}
