//! Ticket API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use faregate_core::{CreateTicketRequest, NotificationEvent, Ticket, TicketFilter, TicketStatus};

use crate::metrics::{TICKETS_CREATED_TOTAL, VALIDATIONS_TOTAL};
use crate::state::AppState;

use super::error::ApiError;
use super::middleware::AuthUser;

/// Maximum allowed limit for ticket queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for ticket queries
const DEFAULT_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct CreateTicketBody {
    #[serde(default)]
    pub ticket_type: String,
    #[serde(default)]
    pub route: String,
}

/// Ticket representation returned by the API.
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: String,
    pub ticket_type: String,
    pub route: String,
    pub price: i64,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    pub created_at: String,
    pub valid_until: String,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            ticket_type: ticket.ticket_type,
            route: ticket.route,
            price: ticket.price,
            status: ticket.status,
            qr_code: ticket.qr_code,
            created_at: ticket.created_at.to_rfc3339(),
            valid_until: ticket.valid_until.to_rfc3339(),
        }
    }
}

/// Create a new ticket
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(body): Json<CreateTicketBody>,
) -> Result<(StatusCode, Json<TicketResponse>), ApiError> {
    if body.ticket_type.is_empty() || body.route.is_empty() {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    }

    let ticket = state.tickets().create(
        CreateTicketRequest {
            user_id: claims.user_id.clone(),
            ticket_type: body.ticket_type,
            route: body.route,
        },
        Utc::now(),
    )?;

    TICKETS_CREATED_TOTAL.inc();
    state.notifier().publish(NotificationEvent::TicketCreated {
        user_id: claims.user_id,
        ticket_id: ticket.id.clone(),
    });

    Ok((StatusCode::CREATED, Json(TicketResponse::from(ticket))))
}

/// Get a ticket by ID
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TicketResponse>, ApiError> {
    let ticket = state
        .tickets()
        .get(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("Ticket not found: {id}")))?;

    if ticket.user_id != claims.user_id {
        return Err(ApiError::Forbidden(
            "Ticket belongs to another user".to_string(),
        ));
    }

    Ok(Json(TicketResponse::from(ticket)))
}

/// Query parameters for listing tickets
#[derive(Debug, Deserialize)]
pub struct ListTicketsParams {
    /// Filter by status
    pub status: Option<String>,
    /// Maximum number of tickets to return
    pub limit: Option<i64>,
    /// Pagination offset
    pub offset: Option<i64>,
}

/// List the requester's tickets
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(params): Query<ListTicketsParams>,
) -> Result<Json<Vec<TicketResponse>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut filter = TicketFilter::new().with_limit(limit).with_offset(offset);
    if let Some(ref status) = params.status {
        let status = TicketStatus::parse(status)
            .ok_or_else(|| ApiError::Validation(format!("Unknown ticket status: {status}")))?;
        filter = filter.with_status(status);
    }

    let tickets = state.tickets().list_for_user(&claims.user_id, &filter)?;
    Ok(Json(tickets.into_iter().map(TicketResponse::from).collect()))
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
}

/// Consume a ticket at a gate.
///
/// Deliberately unauthenticated: scanners have no user context, and any
/// caller may validate any ticket by id.
pub async fn validate_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ValidationResponse>, ApiError> {
    let validation = state.tickets().validate(&id, Utc::now())?;

    let outcome = if validation.valid { "accepted" } else { "rejected" };
    VALIDATIONS_TOTAL.with_label_values(&[outcome]).inc();

    Ok(Json(ValidationResponse {
        valid: validation.valid,
        reason: validation.reason,
        ticket_id: validation.valid.then_some(id),
    }))
}
