use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, VerifiedIdentity};
use crate::error::ApiError;
use crate::state::AppState;

/// Bearer-token middleware: verifies the token with the identity provider and
/// injects the resulting [`VerifiedIdentity`] into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let identity = state.verifier.verify(token).await.map_err(|e| {
        tracing::warn!("Rejected bearer token for {} {}: {}", request.method(), request.uri().path(), e);
        ApiError::from(e)
    })?;

    tracing::debug!("Authenticated {} ({})", identity.email, identity.uid);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers.get(header::AUTHORIZATION).ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let token = auth_str.strip_prefix("Bearer ").ok_or(AuthError::MalformedHeader)?.trim();
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}

/// Identity injected by [`require_auth`]; a handler mounted without it gets 401
pub fn identity(request: &Request) -> Result<&VerifiedIdentity, ApiError> {
    request
        .extensions()
        .get::<VerifiedIdentity>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))
}
