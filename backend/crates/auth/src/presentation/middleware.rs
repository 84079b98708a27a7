//! Request Authentication Middleware
//!
//! Runs in front of every route: extracts the bearer token, validates
//! it, consults the access policy for the request path, and injects
//! the verified identity into request extensions for handlers.
//!
//! A missing token is an anonymous request and still reaches public
//! routes; a present-but-invalid token is rejected immediately, even
//! on public routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::sync::Arc;

use crate::domain::policy::{AccessPolicy, Decision};
use crate::domain::token::{TokenCodec, TokenError};
use crate::domain::value_object::role::RoleSet;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthLayerState {
    pub codec: Arc<TokenCodec>,
    pub policy: Arc<AccessPolicy>,
}

impl AuthLayerState {
    pub fn new(codec: Arc<TokenCodec>, policy: Arc<AccessPolicy>) -> Self {
        Self { codec, policy }
    }
}

/// Verified identity of the current request, stored in request
/// extensions. Absent for anonymous requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Token subject (the username)
    pub subject: String,
    pub roles: RoleSet,
}

/// Middleware authenticating and authorizing every request
pub async fn authenticate(
    State(state): State<AuthLayerState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let claims = match bearer_token(req.headers()) {
        Ok(Some(token)) => match state.codec.validate(token, Utc::now()) {
            Ok(claims) => Some(claims),
            Err(e) => return Err(AuthError::Token(e).into_response()),
        },
        Ok(None) => None,
        Err(e) => return Err(AuthError::Token(e).into_response()),
    };

    let caller = claims.as_ref().map(|c| &c.roles);

    match state.policy.authorize(req.uri().path(), caller) {
        Decision::Allow => {}
        Decision::DenyUnauthenticated => {
            return Err(AuthError::Unauthenticated.into_response());
        }
        Decision::DenyForbidden => {
            tracing::warn!(
                path = %req.uri().path(),
                subject = claims.as_ref().map(|c| c.sub.as_str()).unwrap_or("-"),
                "Access denied"
            );
            return Err(AuthError::Forbidden.into_response());
        }
    }

    if let Some(claims) = claims {
        req.extensions_mut().insert(AuthContext {
            subject: claims.sub,
            roles: claims.roles,
        });
    }

    Ok(next.run(req).await)
}

/// Extract the bearer token from the Authorization header.
///
/// No header means anonymous; a header with any other scheme or an
/// empty credential is malformed.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, TokenError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| TokenError::Malformed)?;
    let token = value.strip_prefix("Bearer ").ok_or(TokenError::Malformed)?;
    let token = token.trim();

    if token.is_empty() {
        return Err(TokenError::Malformed);
    }

    Ok(Some(token))
}
