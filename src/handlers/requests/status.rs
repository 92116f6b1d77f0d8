use axum::extract::{Path, State};

use crate::database::models::DonationStatusPatch;
use crate::database::UpdateAck;
use crate::middleware::{parse_id, ApiResponse, ApiResult, ValidJson};
use crate::state::AppState;

/// PATCH /requests/:id/status - authenticated
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<DonationStatusPatch>,
) -> ApiResult<UpdateAck> {
    let id = parse_id(&id)?;

    let ack = state.requests.set_status(id, body.donation_status).await?;
    tracing::info!("Request {} status set to {}", id, body.donation_status);
    Ok(ApiResponse::success(ack))
}
