//! Authentication extractor and metrics middleware for API routes.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, Request},
    middleware::Next,
    response::Response,
};

use faregate_core::{AuthError, Claims};

use crate::metrics::{
    normalize_path, AUTH_FAILURES_TOTAL, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL,
    HTTP_REQUEST_DURATION,
};
use crate::state::AppState;

use super::error::ApiError;

/// Metrics middleware that tracks HTTP request duration and counts.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

/// Extractor resolving the bearer credential to verified claims.
///
/// Handlers that take an `AuthUser` parameter are authenticated; routes
/// without one (register, login, gate validation, health) skip the gate
/// entirely.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let result = match state.auth().resolve(bearer) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(e) => {
                AUTH_FAILURES_TOTAL
                    .with_label_values(&[failure_label(&e)])
                    .inc();
                Err(ApiError::from(e))
            }
        };

        std::future::ready(result)
    }
}

fn failure_label(error: &AuthError) -> &'static str {
    match error {
        AuthError::Missing => "missing",
        AuthError::Expired => "expired",
        AuthError::Invalid => "invalid",
    }
}
