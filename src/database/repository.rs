use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::ack::{DeleteAck, InsertAck, UpdateAck};
use crate::database::manager::DatabaseError;
use crate::database::models::{
    DonationAssignment, DonationRequest, DonationRequestUpdate, Donor, DonorField, DonorProfile, RequestField,
};
use crate::filter::Filter;
use crate::types::{DonationStatus, DonorStatus, Role};

/// Storage operations over the `donors` collection
#[async_trait]
pub trait DonorRepository: Send + Sync {
    /// Fails with [`DatabaseError::Conflict`] when the email is already registered
    async fn insert(&self, donor: Donor) -> Result<InsertAck, DatabaseError>;

    async fn find(&self, filter: Filter<DonorField>) -> Result<Vec<Donor>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Donor>, DatabaseError>;

    async fn update_profile(
        &self,
        id: Uuid,
        profile: DonorProfile,
        modified_at: DateTime<Utc>,
    ) -> Result<UpdateAck, DatabaseError>;

    async fn set_status(&self, id: Uuid, status: DonorStatus) -> Result<UpdateAck, DatabaseError>;

    async fn set_role(&self, id: Uuid, role: Role) -> Result<UpdateAck, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Storage operations over the `requests` collection
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn insert(&self, request: DonationRequest) -> Result<InsertAck, DatabaseError>;

    async fn find(&self, filter: Filter<RequestField>) -> Result<Vec<DonationRequest>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DonationRequest>, DatabaseError>;

    async fn update(&self, id: Uuid, changes: DonationRequestUpdate) -> Result<UpdateAck, DatabaseError>;

    async fn set_status(&self, id: Uuid, status: DonationStatus) -> Result<UpdateAck, DatabaseError>;

    /// Attach a donor and move the request to `inprogress`.
    ///
    /// Only applies while the request is still pending; an existing request in
    /// any other status yields [`DatabaseError::Conflict`].
    async fn assign(&self, id: Uuid, assignment: DonationAssignment) -> Result<UpdateAck, DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<DeleteAck, DatabaseError>;
}
