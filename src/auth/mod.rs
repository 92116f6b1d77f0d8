pub mod firebase;

use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use thiserror::Error;

pub use firebase::FirebaseVerifier;

/// Caller identity established by a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Empty bearer token")]
    EmptyToken,

    #[error("Token header has no key id")]
    MissingKeyId,

    #[error("Unsupported token algorithm: {0:?}")]
    UnsupportedAlgorithm(Algorithm),

    #[error("Unknown signing key: {0}")]
    UnknownKey(String),

    #[error("Token has no email claim")]
    MissingEmail,

    #[error("Invalid token claims: {0}")]
    InvalidClaims(String),

    #[error("Invalid token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(#[from] reqwest::Error),

    #[error("Identity provider misconfigured: {0}")]
    Credentials(String),
}

/// Verifies a bearer token with the external identity provider.
///
/// Every call re-verifies; implementations must not cache verification results.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}
