use axum::extract::{Path, State};
use chrono::Utc;

use crate::database::models::{DonorProfile, DonorStatusPatch};
use crate::database::UpdateAck;
use crate::middleware::{parse_id, ApiResponse, ApiResult, ValidJson};
use crate::state::AppState;

/// PUT /donors/:id - replace profile fields and stamp modifiedAt
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<DonorProfile>,
) -> ApiResult<UpdateAck> {
    let id = parse_id(&id)?;
    body.validate()?;

    let ack = state.donors.update_profile(id, body, Utc::now()).await?;
    Ok(ApiResponse::success(ack))
}

/// PATCH /donors/:id/status - admin only
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<DonorStatusPatch>,
) -> ApiResult<UpdateAck> {
    let id = parse_id(&id)?;

    let ack = state.donors.set_status(id, body.status).await?;
    tracing::info!("Donor {} status set to {}", id, body.status);
    Ok(ApiResponse::success(ack))
}
