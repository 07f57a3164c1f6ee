//! HTTP API Module
//!
//! Thin handlers over the ordering core. Authentication/session
//! issuance is an external collaborator: the upstream gateway verifies
//! the session and forwards the caller's user id in `x-user-id`, which
//! [`CallerIdentity`] extracts. Admin-route authorization happens at the
//! same gateway and is not re-checked here.

pub mod admin;
pub mod cart;
pub mod health;
pub mod orders;
pub mod statistics;
pub mod stream;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::utils::AppError;

/// Caller identity forwarded by the upstream auth gateway
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub String);

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| CallerIdentity(v.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}
