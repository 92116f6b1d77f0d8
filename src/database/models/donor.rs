use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::{Column, FieldValue, Filterable};
use crate::types::{DonorStatus, Role};
use crate::validation::ValidationErrors;

pub const DONORS_TABLE: &str = "donors";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub district: String,
    pub upazila: String,
    pub blood_group: String,
    pub image: Option<String>,
    pub role: Role,
    pub status: DonorStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Donor {
    /// Build a fresh donor record from a registration; role and status take their defaults
    pub fn register(registration: DonorRegistration, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: registration.name,
            email: registration.email,
            district: registration.district,
            upazila: registration.upazila,
            blood_group: registration.blood_group,
            image: registration.image,
            role: Role::default(),
            status: DonorStatus::default(),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn apply_profile(&mut self, profile: DonorProfile, modified_at: DateTime<Utc>) {
        self.name = profile.name;
        self.email = profile.email;
        self.district = profile.district;
        self.upazila = profile.upazila;
        self.blood_group = profile.blood_group;
        self.image = profile.image;
        self.modified_at = modified_at;
    }
}

/// Raw `donors` row; enum columns are stored as text
#[derive(Debug, Clone, FromRow)]
pub struct DonorRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub district: String,
    pub upazila: String,
    pub blood_group: String,
    pub image: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl TryFrom<DonorRow> for Donor {
    type Error = DatabaseError;

    fn try_from(row: DonorRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(|e| DatabaseError::QueryError(format!("donor {}: {}", row.id, e)))?;
        let status = row.status.parse().map_err(|e| DatabaseError::QueryError(format!("donor {}: {}", row.id, e)))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            district: row.district,
            upazila: row.upazila,
            blood_group: row.blood_group,
            image: row.image,
            role,
            status,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DonorField {
    Email,
    BloodGroup,
    District,
    Upazila,
    CreatedAt,
}

impl Column for DonorField {
    fn column(&self) -> &'static str {
        match self {
            DonorField::Email => "email",
            DonorField::BloodGroup => "blood_group",
            DonorField::District => "district",
            DonorField::Upazila => "upazila",
            DonorField::CreatedAt => "created_at",
        }
    }
}

impl Filterable<DonorField> for Donor {
    fn field(&self, column: DonorField) -> Option<FieldValue<'_>> {
        Some(match column {
            DonorField::Email => FieldValue::Text(&self.email),
            DonorField::BloodGroup => FieldValue::Text(&self.blood_group),
            DonorField::District => FieldValue::Text(&self.district),
            DonorField::Upazila => FieldValue::Text(&self.upazila),
            DonorField::CreatedAt => FieldValue::Timestamp(self.created_at),
        })
    }
}

/// POST /donors body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DonorRegistration {
    pub name: String,
    pub email: String,
    pub district: String,
    pub upazila: String,
    pub blood_group: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl DonorRegistration {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_profile_fields(&self.name, &self.email, &self.district, &self.upazila, &self.blood_group)
    }
}

/// PUT /donors/:id body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DonorProfile {
    pub name: String,
    pub email: String,
    pub district: String,
    pub upazila: String,
    pub blood_group: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl DonorProfile {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_profile_fields(&self.name, &self.email, &self.district, &self.upazila, &self.blood_group)
    }
}

fn validate_profile_fields(
    name: &str,
    email: &str,
    district: &str,
    upazila: &str,
    blood_group: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require("name", name);
    errors.email("email", email);
    errors.require("district", district);
    errors.require("upazila", upazila);
    errors.blood_group("bloodGroup", blood_group);
    errors.into_result()
}

/// PATCH /donors/:id/status body
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonorStatusPatch {
    pub status: DonorStatus,
}

/// PATCH /donors/:id/role body
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonorRolePatch {
    pub role: Role,
}
