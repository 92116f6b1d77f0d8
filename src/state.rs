use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::database::{DonorRepository, RequestRepository};

/// Handles shared by every request. Built once at startup and injected into
/// the router; nothing in here is mutated by handlers.
#[derive(Clone)]
pub struct AppState {
    pub donors: Arc<dyn DonorRepository>,
    pub requests: Arc<dyn RequestRepository>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(
        donors: Arc<dyn DonorRepository>,
        requests: Arc<dyn RequestRepository>,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> Self {
        Self { donors, requests, verifier }
    }
}
