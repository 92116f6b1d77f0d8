pub mod donor;
pub mod request;

pub use donor::{Donor, DonorField, DonorProfile, DonorRegistration, DonorRolePatch, DonorRow, DonorStatusPatch};
pub use request::{
    DonationAssignment, DonationRequest, DonationRequestRow, DonationRequestUpdate, DonationStatusPatch,
    NewDonationRequest, RequestField,
};
