//! Mock payment route

use axum::{extract::State, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/payment/process-payment
///
/// Mock flow with no gateway: record the payment, store only the last
/// four card digits, and flip the subscription flag.
pub async fn process_payment(
    State(state): State<AppState>,
    Json(req): Json<ProcessPaymentRequest>,
) -> Result<Json<ProcessPaymentResponse>> {
    let digits: String = req.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return Err(ApiError::BadRequest("Invalid card number".to_string()));
    }

    let user = state
        .db
        .get_user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with email {}", req.email)))?;

    // Double payment from an already-subscribed user is reported as a
    // failed transaction, not an error status.
    if user.is_subscribed {
        return Ok(Json(ProcessPaymentResponse {
            subscription_status: true,
            payment: None,
            failed: Some(true),
        }));
    }

    let last_four = &digits[digits.len() - 4..];
    let payment = state
        .db
        .insert_payment(user.id, &req.email, last_four, req.amount)
        .await?;
    state.db.set_user_subscribed(user.id).await?;

    tracing::info!(user_id = %user.id, "subscription activated");
    Ok(Json(ProcessPaymentResponse {
        subscription_status: true,
        payment: Some(payment),
        failed: None,
    }))
}
