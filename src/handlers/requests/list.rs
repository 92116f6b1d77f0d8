use axum::extract::{Query, State};
use axum::Extension;
use serde::Deserialize;

use crate::auth::VerifiedIdentity;
use crate::database::models::request::REQUESTS_TABLE;
use crate::database::models::{DonationRequest, RequestField};
use crate::error::ApiError;
use crate::filter::{Filter, SortDirection};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::DonationStatus;

const LATEST_LIMIT: i64 = 3;

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub donation_status: Option<String>,
}

fn newest_first() -> Filter<RequestField> {
    Filter::new(REQUESTS_TABLE).order(RequestField::CreatedAt, SortDirection::Desc)
}

/// GET /requests/all - admin only
pub async fn all(State(state): State<AppState>) -> ApiResult<Vec<DonationRequest>> {
    let requests = state.requests.find(newest_first()).await?;
    Ok(ApiResponse::success(requests))
}

/// GET /requests?email=
pub async fn list(State(state): State<AppState>, Query(query): Query<EmailQuery>) -> ApiResult<Vec<DonationRequest>> {
    let filter = newest_first().where_opt(RequestField::RequesterEmail, query.email.as_deref());

    let requests = state.requests.find(filter).await?;
    Ok(ApiResponse::success(requests))
}

/// GET /requests/latest?email= - the caller's three newest requests.
/// Asking for someone else's email is forbidden.
pub async fn latest(
    State(state): State<AppState>,
    Extension(caller): Extension<VerifiedIdentity>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Vec<DonationRequest>> {
    let email = match query.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) if email != caller.email => {
            tracing::warn!("{} asked for requests of {}", caller.email, email);
            return Err(ApiError::forbidden("Forbidden access"));
        }
        _ => caller.email.as_str(),
    };

    let filter = newest_first()
        .where_eq(RequestField::RequesterEmail, email)
        .limit(LATEST_LIMIT);

    let requests = state.requests.find(filter).await?;
    Ok(ApiResponse::success(requests))
}

/// GET /requests/pending?donationStatus=
pub async fn pending(State(state): State<AppState>, Query(query): Query<StatusQuery>) -> ApiResult<Vec<DonationRequest>> {
    let status = match query.donation_status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<DonationStatus>()
                .map_err(|e| ApiError::bad_request(e.to_string()))?,
        ),
        None => None,
    };

    let mut filter = newest_first();
    if let Some(status) = status {
        filter = filter.where_eq(RequestField::DonationStatus, status.as_str());
    }

    let requests = state.requests.find(filter).await?;
    Ok(ApiResponse::success(requests))
}
