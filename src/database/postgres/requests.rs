use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::bind_params;
use crate::database::ack::{DeleteAck, InsertAck, UpdateAck};
use crate::database::manager::DatabaseError;
use crate::database::models::{
    DonationAssignment, DonationRequest, DonationRequestRow, DonationRequestUpdate, RequestField,
};
use crate::database::repository::RequestRepository;
use crate::filter::Filter;
use crate::types::DonationStatus;

#[derive(Clone)]
pub struct PgRequestRepository {
    pool: PgPool,
}

impl PgRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestRepository for PgRequestRepository {
    async fn insert(&self, request: DonationRequest) -> Result<InsertAck, DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO requests
                (id, requester_name, requester_email, recipient_name, hospital_name, address,
                 donation_date, donation_time, message, donor_name, donor_email,
                 blood_group, district, upazila, donation_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(request.id)
        .bind(&request.requester_name)
        .bind(&request.requester_email)
        .bind(&request.recipient_name)
        .bind(&request.hospital_name)
        .bind(&request.address)
        .bind(request.donation_date)
        .bind(&request.donation_time)
        .bind(&request.message)
        .bind(&request.donor_name)
        .bind(&request.donor_email)
        .bind(&request.blood_group)
        .bind(&request.district)
        .bind(&request.upazila)
        .bind(request.donation_status.as_str())
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "request"))?;

        Ok(InsertAck::new(request.id))
    }

    async fn find(&self, filter: Filter<RequestField>) -> Result<Vec<DonationRequest>, DatabaseError> {
        let sql = filter.to_sql();
        tracing::debug!("request query: {}", sql.query);
        let rows = bind_params(sqlx::query_as::<_, DonationRequestRow>(&sql.query), &sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(DonationRequest::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DonationRequest>, DatabaseError> {
        let row = sqlx::query_as::<_, DonationRequestRow>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(DonationRequest::try_from).transpose()
    }

    async fn update(&self, id: Uuid, changes: DonationRequestUpdate) -> Result<UpdateAck, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE requests SET
                requester_name  = COALESCE($2, requester_name),
                requester_email = COALESCE($3, requester_email),
                recipient_name  = COALESCE($4, recipient_name),
                hospital_name   = COALESCE($5, hospital_name),
                address         = COALESCE($6, address),
                donation_date   = COALESCE($7, donation_date),
                donation_time   = COALESCE($8, donation_time),
                message         = COALESCE($9, message),
                donor_name      = COALESCE($10, donor_name),
                donor_email     = COALESCE($11, donor_email),
                blood_group     = COALESCE($12, blood_group),
                district        = COALESCE($13, district),
                upazila         = COALESCE($14, upazila),
                donation_status = COALESCE($15, donation_status)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.requester_name)
        .bind(&changes.requester_email)
        .bind(&changes.recipient_name)
        .bind(&changes.hospital_name)
        .bind(&changes.address)
        .bind(changes.donation_date)
        .bind(&changes.donation_time)
        .bind(&changes.message)
        .bind(&changes.donor_name)
        .bind(&changes.donor_email)
        .bind(&changes.blood_group)
        .bind(&changes.district)
        .bind(&changes.upazila)
        .bind(changes.donation_status.map(|s| s.as_str()))
        .execute(&self.pool)
        .await?;

        Ok(UpdateAck::rows(result.rows_affected()))
    }

    async fn set_status(&self, id: Uuid, status: DonationStatus) -> Result<UpdateAck, DatabaseError> {
        let result = sqlx::query("UPDATE requests SET donation_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(UpdateAck::rows(result.rows_affected()))
    }

    async fn assign(&self, id: Uuid, assignment: DonationAssignment) -> Result<UpdateAck, DatabaseError> {
        // Conditional on the current status so two donors cannot both claim a request
        let result = sqlx::query(
            r#"
            UPDATE requests
            SET donor_name = $2, donor_email = $3, donation_status = $4
            WHERE id = $1 AND donation_status = $5
            "#,
        )
        .bind(id)
        .bind(&assignment.donor_name)
        .bind(&assignment.donor_email)
        .bind(DonationStatus::InProgress.as_str())
        .bind(DonationStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(UpdateAck::rows(result.rows_affected()));
        }

        let current: Option<String> = sqlx::query_scalar("SELECT donation_status FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match current {
            Some(status) => Err(DatabaseError::Conflict(format!(
                "request {} is already {} and cannot be assigned",
                id, status
            ))),
            None => Ok(UpdateAck::rows(0)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<DeleteAck, DatabaseError> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(DeleteAck::rows(result.rows_affected()))
    }
}
