//! Repository tests against a live Postgres. Skipped unless DATABASE_URL is set.

use anyhow::Result;
use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use blood_donation_api::config::AppConfig;
use blood_donation_api::database::models::request::REQUESTS_TABLE;
use blood_donation_api::database::models::{
    DonationAssignment, DonationRequest, DonationRequestUpdate, Donor, DonorField, DonorProfile, DonorRegistration,
    NewDonationRequest, RequestField,
};
use blood_donation_api::database::postgres::{PgDonorRepository, PgRequestRepository};
use blood_donation_api::database::{DatabaseError, DatabaseManager, DonorRepository, RequestRepository};
use blood_donation_api::filter::{Filter, SortDirection};
use blood_donation_api::types::{DonationStatus, Role};

async fn pool() -> Result<Option<PgPool>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return Ok(None);
    };

    let mut config = AppConfig::development().database;
    config.url = Some(url);
    let pool = DatabaseManager::connect(&config).await?;
    DatabaseManager::migrate(&pool).await?;
    Ok(Some(pool))
}

/// Unique per run so tests can share one database
fn unique_email(name: &str) -> String {
    format!("{}-{}@example.com", name, Uuid::new_v4().simple())
}

fn donor(address: &str, group: &str) -> Result<Donor> {
    let registration: DonorRegistration = serde_json::from_value(json!({
        "name": "Test", "email": address, "district": "Dhaka", "upazila": "Savar", "bloodGroup": group
    }))?;
    Ok(Donor::register(registration, Utc::now()))
}

fn request(requester: &str) -> Result<DonationRequest> {
    let new: NewDonationRequest = serde_json::from_value(json!({
        "requesterEmail": requester, "recipientName": "Karim", "bloodGroup": "B+", "district": "Dhaka", "upazila": "Lalbagh"
    }))?;
    Ok(DonationRequest::open(new, Utc::now()))
}

fn assignment(name: &str) -> Result<DonationAssignment> {
    Ok(serde_json::from_value(json!({ "donorName": name, "donorEmail": unique_email(name) }))?)
}

#[tokio::test]
async fn donor_round_trip_and_duplicate_email() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let repo = PgDonorRepository::new(pool);
    let address = unique_email("rahim");

    let ack = repo.insert(donor(&address, "O+")?).await?;
    assert!(ack.acknowledged);

    let err = repo.insert(donor(&address, "A+")?).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)));

    let found = repo
        .find(Filter::new("donors").where_eq(DonorField::Email, address.as_str()))
        .await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, ack.inserted_id);
    assert_eq!(found[0].role, Role::Donor);

    repo.set_role(ack.inserted_id, Role::Admin).await?;
    let stored = repo.find_by_email(&address).await?.expect("inserted");
    assert_eq!(stored.role, Role::Admin);

    repo.ping().await?;
    Ok(())
}

#[tokio::test]
async fn profile_update_of_unknown_id_matches_nothing() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let repo = PgDonorRepository::new(pool);
    let address = unique_email("rahim");
    repo.insert(donor(&address, "O+")?).await?;

    let profile: DonorProfile = serde_json::from_value(json!({
        "name": "Other", "email": address, "district": "Khulna", "upazila": "Sadar", "bloodGroup": "A-"
    }))?;
    let ack = repo.update_profile(Uuid::new_v4(), profile, Utc::now()).await?;
    assert_eq!(ack.matched_count, 0);
    Ok(())
}

#[tokio::test]
async fn assignment_is_conditional_on_pending() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let repo = PgRequestRepository::new(pool);
    let id = repo.insert(request(&unique_email("rahim"))?).await?.inserted_id;

    let first = repo.assign(id, assignment("salma")?).await?;
    assert_eq!(first.matched_count, 1);

    let stored = repo.find_by_id(id).await?.expect("inserted");
    assert_eq!(stored.donation_status, DonationStatus::InProgress);
    assert_eq!(stored.donor_name.as_deref(), Some("salma"));
    assert_eq!(stored.recipient_name.as_deref(), Some("Karim"));

    let second = repo.assign(id, assignment("karim")?).await.unwrap_err();
    assert!(matches!(second, DatabaseError::Conflict(_)));

    let missing = repo.assign(Uuid::new_v4(), assignment("karim")?).await?;
    assert_eq!(missing.matched_count, 0);
    Ok(())
}

#[tokio::test]
async fn update_keeps_unsupplied_fields() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let repo = PgRequestRepository::new(pool);
    let id = repo.insert(request(&unique_email("rahim"))?).await?.inserted_id;

    let changes: DonationRequestUpdate =
        serde_json::from_value(json!({ "hospitalName": "Square Hospital", "donationStatus": "canceled" }))?;
    let ack = repo.update(id, changes).await?;
    assert_eq!(ack.matched_count, 1);

    let stored = repo.find_by_id(id).await?.expect("inserted");
    assert_eq!(stored.hospital_name.as_deref(), Some("Square Hospital"));
    assert_eq!(stored.donation_status, DonationStatus::Canceled);
    assert_eq!(stored.recipient_name.as_deref(), Some("Karim"));

    assert_eq!(repo.delete(id).await?.deleted_count, 1);
    assert!(repo.find_by_id(id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn latest_filter_orders_and_limits() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let repo = PgRequestRepository::new(pool);
    let requester = unique_email("rahim");

    let base = Utc::now();
    let mut ids = Vec::new();
    for offset in 0..5 {
        let mut r = request(&requester)?;
        r.created_at = base + Duration::seconds(offset);
        ids.push(repo.insert(r).await?.inserted_id);
    }

    let found = repo
        .find(
            Filter::new(REQUESTS_TABLE)
                .where_eq(RequestField::RequesterEmail, requester.as_str())
                .order(RequestField::CreatedAt, SortDirection::Desc)
                .limit(3),
        )
        .await?;
    let found_ids: Vec<Uuid> = found.iter().map(|r| r.id).collect();
    assert_eq!(found_ids, vec![ids[4], ids[3], ids[2]]);
    Ok(())
}
