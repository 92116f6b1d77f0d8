use axum::extract::{Path, State};
use serde::Serialize;

use crate::database::models::DonorRolePatch;
use crate::database::UpdateAck;
use crate::middleware::{parse_id, ApiResponse, ApiResult, ValidJson};
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: Role,
}

/// GET /donors/:email/role - stored role, `donor` when the email is not registered
pub async fn role_lookup(State(state): State<AppState>, Path(email): Path<String>) -> ApiResult<RoleResponse> {
    let role = state
        .donors
        .find_by_email(&email)
        .await?
        .map(|donor| donor.role)
        .unwrap_or_default();

    Ok(ApiResponse::success(RoleResponse { role }))
}

/// PATCH /donors/:id/role - admin only
pub async fn set_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<DonorRolePatch>,
) -> ApiResult<UpdateAck> {
    let id = parse_id(&id)?;

    let ack = state.donors.set_role(id, body.role).await?;
    tracing::info!("Donor {} role set to {}", id, body.role);
    Ok(ApiResponse::success(ack))
}
