use axum::extract::{Path, State};

use crate::database::models::{DonationAssignment, DonationRequest, DonationRequestUpdate};
use crate::database::{DeleteAck, UpdateAck};
use crate::middleware::{parse_id, ApiResponse, ApiResult, ValidJson};
use crate::state::AppState;

/// GET /requests/:id - `null` when nothing matches
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Option<DonationRequest>> {
    let id = parse_id(&id)?;

    let request = state.requests.find_by_id(id).await?;
    Ok(ApiResponse::success(request))
}

/// PUT /requests/:id - set whichever editable fields were supplied
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<DonationRequestUpdate>,
) -> ApiResult<UpdateAck> {
    let id = parse_id(&id)?;
    body.validate()?;

    let ack = state.requests.update(id, body).await?;
    Ok(ApiResponse::success(ack))
}

/// PATCH /requests/:id - a donor takes a pending request
pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<DonationAssignment>,
) -> ApiResult<UpdateAck> {
    let id = parse_id(&id)?;
    body.validate()?;

    let donor_email = body.donor_email.clone();
    let ack = state.requests.assign(id, body).await?;

    if ack.matched_count > 0 {
        tracing::info!("Request {} assigned to {}", id, donor_email);
    }
    Ok(ApiResponse::success(ack))
}

/// DELETE /requests/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<DeleteAck> {
    let id = parse_id(&id)?;

    let ack = state.requests.delete(id).await?;
    Ok(ApiResponse::success(ack))
}
