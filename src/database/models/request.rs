use chrono::{DateTime, NaiveDate, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::{Column, FieldValue, Filterable};
use crate::types::DonationStatus;
use crate::validation::ValidationErrors;

pub const REQUESTS_TABLE: &str = "requests";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub id: Uuid,
    pub requester_name: Option<String>,
    pub requester_email: String,
    pub recipient_name: Option<String>,
    pub hospital_name: Option<String>,
    pub address: Option<String>,
    pub donation_date: Option<NaiveDate>,
    pub donation_time: Option<String>,
    pub message: Option<String>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub blood_group: String,
    pub district: String,
    pub upazila: String,
    pub donation_status: DonationStatus,
    pub created_at: DateTime<Utc>,
}

impl DonationRequest {
    /// New requests always start out pending, stamped with the server clock
    pub fn open(new: NewDonationRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            requester_name: new.requester_name,
            requester_email: new.requester_email,
            recipient_name: new.recipient_name,
            hospital_name: new.hospital_name,
            address: new.address,
            donation_date: new.donation_date,
            donation_time: new.donation_time,
            message: new.message,
            donor_name: None,
            donor_email: None,
            blood_group: new.blood_group,
            district: new.district,
            upazila: new.upazila,
            donation_status: DonationStatus::Pending,
            created_at: now,
        }
    }

    pub fn apply_update(&mut self, changes: DonationRequestUpdate) {
        if let Some(v) = changes.requester_email {
            self.requester_email = v;
        }
        if let Some(v) = changes.blood_group {
            self.blood_group = v;
        }
        if let Some(v) = changes.district {
            self.district = v;
        }
        if let Some(v) = changes.upazila {
            self.upazila = v;
        }
        if let Some(v) = changes.donation_status {
            self.donation_status = v;
        }
        self.requester_name = changes.requester_name.or(self.requester_name.take());
        self.recipient_name = changes.recipient_name.or(self.recipient_name.take());
        self.hospital_name = changes.hospital_name.or(self.hospital_name.take());
        self.address = changes.address.or(self.address.take());
        self.donation_date = changes.donation_date.or(self.donation_date);
        self.donation_time = changes.donation_time.or(self.donation_time.take());
        self.message = changes.message.or(self.message.take());
        self.donor_name = changes.donor_name.or(self.donor_name.take());
        self.donor_email = changes.donor_email.or(self.donor_email.take());
    }

    pub fn assign(&mut self, assignment: DonationAssignment) {
        self.donor_name = Some(assignment.donor_name);
        self.donor_email = Some(assignment.donor_email);
        self.donation_status = DonationStatus::InProgress;
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DonationRequestRow {
    pub id: Uuid,
    pub requester_name: Option<String>,
    pub requester_email: String,
    pub recipient_name: Option<String>,
    pub hospital_name: Option<String>,
    pub address: Option<String>,
    pub donation_date: Option<NaiveDate>,
    pub donation_time: Option<String>,
    pub message: Option<String>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub blood_group: String,
    pub district: String,
    pub upazila: String,
    pub donation_status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DonationRequestRow> for DonationRequest {
    type Error = DatabaseError;

    fn try_from(row: DonationRequestRow) -> Result<Self, Self::Error> {
        let donation_status = row
            .donation_status
            .parse()
            .map_err(|e| DatabaseError::QueryError(format!("request {}: {}", row.id, e)))?;
        Ok(Self {
            id: row.id,
            requester_name: row.requester_name,
            requester_email: row.requester_email,
            recipient_name: row.recipient_name,
            hospital_name: row.hospital_name,
            address: row.address,
            donation_date: row.donation_date,
            donation_time: row.donation_time,
            message: row.message,
            donor_name: row.donor_name,
            donor_email: row.donor_email,
            blood_group: row.blood_group,
            district: row.district,
            upazila: row.upazila,
            donation_status,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestField {
    RequesterEmail,
    DonationStatus,
    CreatedAt,
}

impl Column for RequestField {
    fn column(&self) -> &'static str {
        match self {
            RequestField::RequesterEmail => "requester_email",
            RequestField::DonationStatus => "donation_status",
            RequestField::CreatedAt => "created_at",
        }
    }
}

impl Filterable<RequestField> for DonationRequest {
    fn field(&self, column: RequestField) -> Option<FieldValue<'_>> {
        Some(match column {
            RequestField::RequesterEmail => FieldValue::Text(&self.requester_email),
            RequestField::DonationStatus => FieldValue::Text(self.donation_status.as_str()),
            RequestField::CreatedAt => FieldValue::Timestamp(self.created_at),
        })
    }
}

/// POST /requests body.
///
/// `createdAt` and `donationStatus` are accepted so older clients keep working,
/// but their values are discarded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewDonationRequest {
    #[serde(default)]
    pub requester_name: Option<String>,
    pub requester_email: String,
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub donation_date: Option<NaiveDate>,
    #[serde(default)]
    pub donation_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub blood_group: String,
    pub district: String,
    pub upazila: String,
    #[serde(default)]
    pub created_at: Option<IgnoredAny>,
    #[serde(default)]
    pub donation_status: Option<IgnoredAny>,
}

impl NewDonationRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.email("requesterEmail", &self.requester_email);
        errors.blood_group("bloodGroup", &self.blood_group);
        errors.require("district", &self.district);
        errors.require("upazila", &self.upazila);
        errors.into_result()
    }
}

/// PUT /requests/:id body: every editable field, all optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DonationRequestUpdate {
    #[serde(default)]
    pub requester_name: Option<String>,
    #[serde(default)]
    pub requester_email: Option<String>,
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub donation_date: Option<NaiveDate>,
    #[serde(default)]
    pub donation_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub donor_email: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub upazila: Option<String>,
    #[serde(default)]
    pub donation_status: Option<DonationStatus>,
}

impl DonationRequestUpdate {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(email) = &self.requester_email {
            errors.email("requesterEmail", email);
        }
        if let Some(email) = &self.donor_email {
            errors.email("donorEmail", email);
        }
        if let Some(group) = &self.blood_group {
            errors.blood_group("bloodGroup", group);
        }
        if let Some(district) = &self.district {
            errors.require("district", district);
        }
        if let Some(upazila) = &self.upazila {
            errors.require("upazila", upazila);
        }
        errors.into_result()
    }
}

/// PATCH /requests/:id body, sent when a donor accepts a request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DonationAssignment {
    pub donor_name: String,
    pub donor_email: String,
}

impl DonationAssignment {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("donorName", &self.donor_name);
        errors.email("donorEmail", &self.donor_email);
        errors.into_result()
    }
}

/// PATCH /requests/:id/status body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DonationStatusPatch {
    pub donation_status: DonationStatus,
}
