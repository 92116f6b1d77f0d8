use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::ack::{DeleteAck, InsertAck, UpdateAck};
use crate::database::manager::DatabaseError;
use crate::database::models::{
    DonationAssignment, DonationRequest, DonationRequestUpdate, Donor, DonorField, DonorProfile, RequestField,
};
use crate::database::repository::{DonorRepository, RequestRepository};
use crate::filter::Filter;
use crate::types::{DonationStatus, DonorStatus, Role};

/// Process-local donor collection, kept in insertion order
#[derive(Default)]
pub struct MemoryDonorRepository {
    donors: RwLock<Vec<Donor>>,
}

impl MemoryDonorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(donors: &[Donor], email: &str, except: Option<Uuid>) -> bool {
    donors.iter().any(|d| d.email == email && Some(d.id) != except)
}

#[async_trait]
impl DonorRepository for MemoryDonorRepository {
    async fn insert(&self, donor: Donor) -> Result<InsertAck, DatabaseError> {
        let mut donors = self.donors.write().await;
        if email_taken(&donors, &donor.email, None) {
            return Err(DatabaseError::Conflict(format!(
                "donor with email '{}' already exists",
                donor.email
            )));
        }
        let ack = InsertAck::new(donor.id);
        donors.push(donor);
        Ok(ack)
    }

    async fn find(&self, filter: Filter<DonorField>) -> Result<Vec<Donor>, DatabaseError> {
        let donors = self.donors.read().await;
        Ok(filter.apply(donors.iter()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Donor>, DatabaseError> {
        let donors = self.donors.read().await;
        Ok(donors.iter().find(|d| d.email == email).cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        profile: DonorProfile,
        modified_at: DateTime<Utc>,
    ) -> Result<UpdateAck, DatabaseError> {
        let mut donors = self.donors.write().await;
        // an unknown id matches nothing, whatever the email
        if !donors.iter().any(|d| d.id == id) {
            return Ok(UpdateAck::rows(0));
        }
        if email_taken(&donors, &profile.email, Some(id)) {
            return Err(DatabaseError::Conflict(format!(
                "donor with email '{}' already exists",
                profile.email
            )));
        }
        match donors.iter_mut().find(|d| d.id == id) {
            Some(donor) => {
                donor.apply_profile(profile, modified_at);
                Ok(UpdateAck::rows(1))
            }
            None => Ok(UpdateAck::rows(0)),
        }
    }

    async fn set_status(&self, id: Uuid, status: DonorStatus) -> Result<UpdateAck, DatabaseError> {
        let mut donors = self.donors.write().await;
        match donors.iter_mut().find(|d| d.id == id) {
            Some(donor) => {
                donor.status = status;
                Ok(UpdateAck::rows(1))
            }
            None => Ok(UpdateAck::rows(0)),
        }
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<UpdateAck, DatabaseError> {
        let mut donors = self.donors.write().await;
        match donors.iter_mut().find(|d| d.id == id) {
            Some(donor) => {
                donor.role = role;
                Ok(UpdateAck::rows(1))
            }
            None => Ok(UpdateAck::rows(0)),
        }
    }
}

/// Process-local request collection, kept in insertion order
#[derive(Default)]
pub struct MemoryRequestRepository {
    requests: RwLock<Vec<DonationRequest>>,
}

impl MemoryRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestRepository for MemoryRequestRepository {
    async fn insert(&self, request: DonationRequest) -> Result<InsertAck, DatabaseError> {
        let ack = InsertAck::new(request.id);
        self.requests.write().await.push(request);
        Ok(ack)
    }

    async fn find(&self, filter: Filter<RequestField>) -> Result<Vec<DonationRequest>, DatabaseError> {
        let requests = self.requests.read().await;
        Ok(filter.apply(requests.iter()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DonationRequest>, DatabaseError> {
        let requests = self.requests.read().await;
        Ok(requests.iter().find(|r| r.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: DonationRequestUpdate) -> Result<UpdateAck, DatabaseError> {
        let mut requests = self.requests.write().await;
        match requests.iter_mut().find(|r| r.id == id) {
            Some(request) => {
                request.apply_update(changes);
                Ok(UpdateAck::rows(1))
            }
            None => Ok(UpdateAck::rows(0)),
        }
    }

    async fn set_status(&self, id: Uuid, status: DonationStatus) -> Result<UpdateAck, DatabaseError> {
        let mut requests = self.requests.write().await;
        match requests.iter_mut().find(|r| r.id == id) {
            Some(request) => {
                request.donation_status = status;
                Ok(UpdateAck::rows(1))
            }
            None => Ok(UpdateAck::rows(0)),
        }
    }

    async fn assign(&self, id: Uuid, assignment: DonationAssignment) -> Result<UpdateAck, DatabaseError> {
        // check and write under one lock, matching the conditional UPDATE in Postgres
        let mut requests = self.requests.write().await;
        match requests.iter_mut().find(|r| r.id == id) {
            Some(request) if request.donation_status == DonationStatus::Pending => {
                request.assign(assignment);
                Ok(UpdateAck::rows(1))
            }
            Some(request) => Err(DatabaseError::Conflict(format!(
                "request {} is already {} and cannot be assigned",
                id, request.donation_status
            ))),
            None => Ok(UpdateAck::rows(0)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<DeleteAck, DatabaseError> {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests.retain(|r| r.id != id);
        Ok(DeleteAck::rows((before - requests.len()) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::DonorRegistration;
    use crate::filter::SortDirection;
    use chrono::Duration;

    fn donor(email: &str, group: &str) -> Donor {
        let registration: DonorRegistration = serde_json::from_value(serde_json::json!({
            "name": "Test", "email": email, "district": "Dhaka", "upazila": "Savar", "bloodGroup": group
        }))
        .unwrap();
        Donor::register(registration, Utc::now())
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = MemoryDonorRepository::new();
        repo.insert(donor("a@example.com", "O+")).await.unwrap();
        let err = repo.insert(donor("a@example.com", "A+")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_filters_by_exact_value() {
        let repo = MemoryDonorRepository::new();
        repo.insert(donor("a@example.com", "O+")).await.unwrap();
        repo.insert(donor("b@example.com", "O-")).await.unwrap();
        repo.insert(donor("c@example.com", "O+")).await.unwrap();

        let found = repo
            .find(Filter::new("donors").where_eq(DonorField::BloodGroup, "O+"))
            .await
            .unwrap();
        let emails: Vec<&str> = found.iter().map(|d| d.email.as_str()).collect();
        assert_eq!(emails, vec!["a@example.com", "c@example.com"]);
    }

    #[tokio::test]
    async fn missing_id_updates_nothing() {
        let repo = MemoryDonorRepository::new();
        let ack = repo.set_role(Uuid::new_v4(), Role::Admin).await.unwrap();
        assert_eq!(ack.matched_count, 0);
    }

    #[tokio::test]
    async fn unknown_id_with_taken_email_matches_nothing() {
        let repo = MemoryDonorRepository::new();
        repo.insert(donor("a@example.com", "O+")).await.unwrap();

        let profile: DonorProfile = serde_json::from_value(serde_json::json!({
            "name": "Other", "email": "a@example.com", "district": "Dhaka", "upazila": "Savar", "bloodGroup": "A+"
        }))
        .unwrap();
        let ack = repo.update_profile(Uuid::new_v4(), profile, Utc::now()).await.unwrap();
        assert_eq!(ack.matched_count, 0);
    }

    #[tokio::test]
    async fn profile_update_to_taken_email_is_a_conflict() {
        let repo = MemoryDonorRepository::new();
        repo.insert(donor("a@example.com", "O+")).await.unwrap();
        let b = repo.insert(donor("b@example.com", "O-")).await.unwrap();

        let profile: DonorProfile = serde_json::from_value(serde_json::json!({
            "name": "B", "email": "a@example.com", "district": "Dhaka", "upazila": "Savar", "bloodGroup": "O-"
        }))
        .unwrap();
        let err = repo.update_profile(b.inserted_id, profile, Utc::now()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn newest_requests_come_first() {
        let repo = MemoryRequestRepository::new();
        let base = Utc::now();
        for offset in [1, 3, 2] {
            let new = serde_json::from_value(serde_json::json!({
                "requesterEmail": "k@example.com", "bloodGroup": "A+", "district": "d", "upazila": "u"
            }))
            .unwrap();
            repo.insert(DonationRequest::open(new, base + Duration::seconds(offset)))
                .await
                .unwrap();
        }

        let found = repo
            .find(Filter::new("requests").order(RequestField::CreatedAt, SortDirection::Desc))
            .await
            .unwrap();
        let offsets: Vec<i64> = found.iter().map(|r| (r.created_at - base).num_seconds()).collect();
        assert_eq!(offsets, vec![3, 2, 1]);
    }
}
