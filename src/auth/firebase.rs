use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::{AuthError, IdentityVerifier, VerifiedIdentity};
use crate::config::AuthConfig;

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";
const CLOCK_SKEW_SECS: u64 = 60;

/// Claims carried by a Firebase Authentication ID token
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    iat: i64,
    email: Option<String>,
}

/// Fields of a Google service-account file we care about
#[derive(Debug, Deserialize)]
struct ServiceAccount {
    project_id: String,
}

struct CachedKeys {
    fetched_at: Instant,
    keys: JwkSet,
}

enum KeySource {
    /// Google's published secure-token keys, refetched after `ttl` or on an unknown kid
    Remote {
        client: reqwest::Client,
        url: String,
        ttl: Duration,
        cache: RwLock<Option<CachedKeys>>,
    },
    #[cfg(test)]
    Static(std::collections::HashMap<String, DecodingKey>),
}

/// Verifies Firebase ID tokens: RS256, audience = project id,
/// issuer = `https://securetoken.google.com/<project id>`.
pub struct FirebaseVerifier {
    project_id: String,
    keys: KeySource,
}

impl FirebaseVerifier {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let project_id = match (&config.project_id, &config.credentials_path) {
            (Some(id), _) => id.clone(),
            (None, Some(path)) => Self::project_id_from_credentials(path)?,
            (None, None) => {
                return Err(AuthError::Credentials(
                    "set FIREBASE_CREDENTIALS or FIREBASE_PROJECT_ID".to_string(),
                ))
            }
        };

        tracing::info!("Verifying identity tokens for Firebase project '{}'", project_id);

        Ok(Self {
            project_id,
            keys: KeySource::Remote {
                client: reqwest::Client::new(),
                url: config.jwks_url.clone(),
                ttl: Duration::from_secs(config.key_cache_secs),
                cache: RwLock::new(None),
            },
        })
    }

    fn project_id_from_credentials(path: &Path) -> Result<String, AuthError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AuthError::Credentials(format!("cannot read {}: {}", path.display(), e)))?;
        let account: ServiceAccount = serde_json::from_str(&raw)
            .map_err(|e| AuthError::Credentials(format!("invalid service account file {}: {}", path.display(), e)))?;
        Ok(account.project_id)
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        match &self.keys {
            KeySource::Remote { client, url, ttl, cache } => {
                let seen = {
                    let cached = cache.read().await;
                    match cached.as_ref() {
                        Some(c) if c.fetched_at.elapsed() < *ttl => {
                            if let Some(jwk) = c.keys.find(kid) {
                                return Ok(DecodingKey::from_jwk(jwk)?);
                            }
                            Some(c.fetched_at)
                        }
                        Some(c) => Some(c.fetched_at),
                        None => None,
                    }
                };

                // One refresh at a time; whoever waited behind it reuses the new set
                let mut cached = cache.write().await;
                if let Some(c) = cached.as_ref() {
                    if Some(c.fetched_at) != seen {
                        return c
                            .keys
                            .find(kid)
                            .map(DecodingKey::from_jwk)
                            .transpose()?
                            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()));
                    }
                }

                tracing::debug!("Fetching identity provider signing keys from {}", url);
                let keys: JwkSet = client.get(url).send().await?.error_for_status()?.json().await?;
                let key = keys.find(kid).map(DecodingKey::from_jwk).transpose()?;

                *cached = Some(CachedKeys {
                    fetched_at: Instant::now(),
                    keys,
                });

                key.ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
            }
            #[cfg(test)]
            KeySource::Static(keys) => keys
                .get(kid)
                .cloned()
                .ok_or_else(|| AuthError::UnknownKey(kid.to_string())),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("{}{}", ISSUER_PREFIX, self.project_id)]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation.leeway = CLOCK_SKEW_SECS;
        validation
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self.decoding_key(&kid).await?;

        let claims = decode::<FirebaseClaims>(token, &key, &self.validation())?.claims;

        if claims.sub.is_empty() {
            return Err(AuthError::InvalidClaims("empty subject".to_string()));
        }
        if claims.iat > Utc::now().timestamp() + CLOCK_SKEW_SECS as i64 {
            return Err(AuthError::InvalidClaims("token issued in the future".to_string()));
        }
        let email = claims
            .email
            .filter(|e| !e.is_empty())
            .ok_or(AuthError::MissingEmail)?;

        Ok(VerifiedIdentity { uid: claims.sub, email })
    }
}
