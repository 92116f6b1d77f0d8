use axum::extract::State;
use chrono::Utc;

use crate::database::models::{Donor, DonorRegistration};
use crate::database::InsertAck;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::state::AppState;

/// POST /donors - register a donor. Role and status always start at their defaults.
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<DonorRegistration>,
) -> ApiResult<InsertAck> {
    body.validate()?;

    let donor = Donor::register(body, Utc::now());
    let ack = state.donors.insert(donor).await?;

    tracing::info!("Registered donor {}", ack.inserted_id);
    Ok(ApiResponse::created(ack))
}
