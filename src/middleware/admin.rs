use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::identity;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::Role;

/// Admin guard. Must run after [`super::require_auth`]; looks up the caller's
/// stored role and rejects anyone who is not an admin.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let email = identity(&request)?.email.clone();

    let donor = state.donors.find_by_email(&email).await?;

    match donor {
        Some(d) if d.role == Role::Admin => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Admin access denied for '{}': role is not admin", email);
            Err(ApiError::forbidden("Admin role required"))
        }
        None => {
            tracing::warn!("Admin access denied for '{}': no donor record", email);
            Err(ApiError::forbidden("Admin role required"))
        }
    }
}
