use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::bind_params;
use crate::database::ack::{InsertAck, UpdateAck};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Donor, DonorField, DonorProfile, DonorRow};
use crate::database::repository::DonorRepository;
use crate::filter::Filter;
use crate::types::{DonorStatus, Role};

#[derive(Clone)]
pub struct PgDonorRepository {
    pool: PgPool,
}

impl PgDonorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonorRepository for PgDonorRepository {
    async fn insert(&self, donor: Donor) -> Result<InsertAck, DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO donors
                (id, name, email, district, upazila, blood_group, image, role, status, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(donor.id)
        .bind(&donor.name)
        .bind(&donor.email)
        .bind(&donor.district)
        .bind(&donor.upazila)
        .bind(&donor.blood_group)
        .bind(&donor.image)
        .bind(donor.role.as_str())
        .bind(donor.status.as_str())
        .bind(donor.created_at)
        .bind(donor.modified_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, &format!("donor with email '{}'", donor.email)))?;

        Ok(InsertAck::new(donor.id))
    }

    async fn find(&self, filter: Filter<DonorField>) -> Result<Vec<Donor>, DatabaseError> {
        let sql = filter.to_sql();
        tracing::debug!("donor query: {}", sql.query);
        let rows = bind_params(sqlx::query_as::<_, DonorRow>(&sql.query), &sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Donor::try_from).collect()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Donor>, DatabaseError> {
        let row = sqlx::query_as::<_, DonorRow>("SELECT * FROM donors WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Donor::try_from).transpose()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        profile: DonorProfile,
        modified_at: DateTime<Utc>,
    ) -> Result<UpdateAck, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE donors
            SET name = $2, email = $3, district = $4, upazila = $5, blood_group = $6, image = $7, modified_at = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.district)
        .bind(&profile.upazila)
        .bind(&profile.blood_group)
        .bind(&profile.image)
        .bind(modified_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, &format!("donor with email '{}'", profile.email)))?;

        Ok(UpdateAck::rows(result.rows_affected()))
    }

    async fn set_status(&self, id: Uuid, status: DonorStatus) -> Result<UpdateAck, DatabaseError> {
        let result = sqlx::query("UPDATE donors SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(UpdateAck::rows(result.rows_affected()))
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<UpdateAck, DatabaseError> {
        let result = sqlx::query("UPDATE donors SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;
        Ok(UpdateAck::rows(result.rows_affected()))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
