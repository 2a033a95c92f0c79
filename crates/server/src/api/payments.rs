//! Payment API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use faregate_core::{Payment, PaymentStatus};

use crate::metrics::PAYMENTS_TOTAL;
use crate::state::AppState;

use super::error::ApiError;
use super::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct PayBody {
    #[serde(default)]
    pub ticket_id: String,
    #[serde(default)]
    pub payment_method: String,
}

/// Settlement outcome returned from POST /payments.
#[derive(Debug, Serialize)]
pub struct PayResponse {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
}

/// Take payment for a ticket.
pub async fn process_payment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(body): Json<PayBody>,
) -> Result<Response, ApiError> {
    if body.ticket_id.is_empty() || body.payment_method.is_empty() {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    }

    let payment = state
        .processor()
        .pay(&claims.user_id, &body.ticket_id, &body.payment_method)?;

    // A declined settlement is a business outcome, not an error: the
    // payment row comes back with a non-2xx status.
    let completed = payment.status == PaymentStatus::Completed;
    let outcome = if completed { "completed" } else { "failed" };
    PAYMENTS_TOTAL.with_label_values(&[outcome]).inc();

    let status = if completed {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    let response = PayResponse {
        payment_id: payment.id,
        status: payment.status,
        transaction_id: payment.transaction_id,
        ticket_id: completed.then_some(payment.ticket_id),
    };

    Ok((status, Json(response)).into_response())
}

/// Payment representation returned by lookups.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub ticket_id: String,
    pub amount: i64,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub transaction_id: String,
    pub created_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            ticket_id: payment.ticket_id,
            amount: payment.amount,
            status: payment.status,
            payment_method: payment.method,
            transaction_id: payment.transaction_id,
            created_at: payment.created_at.to_rfc3339(),
        }
    }
}

/// Get a payment by ID
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payment = state
        .payments()
        .get(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("Payment not found: {id}")))?;

    if payment.user_id != claims.user_id {
        return Err(ApiError::Forbidden(
            "Payment belongs to another user".to_string(),
        ));
    }

    Ok(Json(PaymentResponse::from(payment)))
}

/// List the requester's payments
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = state.payments().list_for_user(&claims.user_id)?;
    Ok(Json(
        payments.into_iter().map(PaymentResponse::from).collect(),
    ))
}
