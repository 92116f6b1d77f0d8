use axum::extract::{Query, State};
use serde::Deserialize;

use crate::database::models::donor::DONORS_TABLE;
use crate::database::models::{Donor, DonorField};
use crate::filter::{Filter, SortDirection};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorQuery {
    pub email: Option<String>,
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

fn location_filter(blood_group: Option<&str>, district: Option<&str>, upazila: Option<&str>) -> Filter<DonorField> {
    Filter::new(DONORS_TABLE)
        .where_opt(DonorField::BloodGroup, blood_group)
        .where_opt(DonorField::District, district)
        .where_opt(DonorField::Upazila, upazila)
        .order(DonorField::CreatedAt, SortDirection::Asc)
}

/// GET /donors - list donors, optionally filtered by email, bloodGroup, district, upazila
pub async fn list(State(state): State<AppState>, Query(query): Query<DonorQuery>) -> ApiResult<Vec<Donor>> {
    let filter = location_filter(query.blood_group.as_deref(), query.district.as_deref(), query.upazila.as_deref())
        .where_opt(DonorField::Email, query.email.as_deref());

    let donors = state.donors.find(filter).await?;
    Ok(ApiResponse::success(donors))
}

/// GET /donors/search - like list, but no criteria means no results
pub async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> ApiResult<Vec<Donor>> {
    let filter = location_filter(query.blood_group.as_deref(), query.district.as_deref(), query.upazila.as_deref());

    if !filter.has_conditions() {
        return Ok(ApiResponse::success(vec![]));
    }

    let donors = state.donors.find(filter).await?;
    Ok(ApiResponse::success(donors))
}
