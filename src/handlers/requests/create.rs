use axum::extract::State;
use chrono::Utc;

use crate::database::models::{DonationRequest, NewDonationRequest};
use crate::database::InsertAck;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::state::AppState;

/// POST /requests - open a new request as `pending`, stamped with the server clock
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<NewDonationRequest>,
) -> ApiResult<InsertAck> {
    body.validate()?;

    let request = DonationRequest::open(body, Utc::now());
    let ack = state.requests.insert(request).await?;

    tracing::info!("Opened donation request {}", ack.inserted_id);
    Ok(ApiResponse::created(ack))
}
