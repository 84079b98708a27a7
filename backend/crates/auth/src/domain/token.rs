//! Token Codec
//!
//! Self-contained signed bearer tokens: three base64url segments
//! (header, claims, HMAC-SHA256 signature) over the server-held secret.
//! Validation is pure computation - no storage or network access - so
//! every request can verify its token independently and in parallel.
//!
//! The clock is an explicit argument on both operations; nothing in
//! this module reads system time.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;

use crate::domain::value_object::role::RoleSet;

type HmacSha256 = Hmac<Sha256>;

/// Why a token was rejected. All variants surface as an
/// authentication failure at the boundary; the distinction is for
/// logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Structure could not be parsed (segments, base64, JSON, claims)
    #[error("Token is malformed")]
    Malformed,

    /// Signature does not match the payload under the server key
    #[error("Token signature mismatch")]
    BadSignature,

    /// Authentic token past its expiry
    #[error("Token has expired")]
    Expired,
}

/// Claims carried by a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the username at issuance time
    pub sub: String,
    /// Role set frozen at issuance; role changes do not propagate
    pub roles: RoleSet,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Expires-at, Unix seconds (exclusive: token is invalid at exp)
    pub exp: i64,
}

#[derive(Serialize, Deserialize)]
struct WireHeader {
    alg: String,
    typ: String,
}

#[derive(Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    roles: String,
    iat: i64,
    exp: i64,
}

/// Issues and validates signed tokens with a fixed key and TTL.
///
/// The key and TTL are process-wide configuration, immutable after
/// startup; the codec is freely shareable across request tasks.
#[derive(Clone)]
pub struct TokenCodec {
    secret: [u8; 32],
    ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: [u8; 32], ttl: Duration) -> Self {
        Self {
            secret,
            ttl_secs: ttl.as_secs() as i64,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs as u64)
    }

    /// Build, serialize and sign a token for `subject` with `roles`.
    pub fn issue(&self, subject: &str, roles: &RoleSet, now: DateTime<Utc>) -> String {
        let header = WireHeader {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        };
        let claims = WireClaims {
            sub: subject.to_string(),
            roles: roles.to_claim(),
            iat: now.timestamp(),
            exp: now.timestamp() + self.ttl_secs,
        };

        let header_b64 =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).expect("header serializes"));
        let claims_b64 =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).expect("claims serialize"));

        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = self.sign(signing_input.as_bytes());

        format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature))
    }

    /// Re-verify a presented token and return its claims.
    ///
    /// Order: structure, then signature, then content, then expiry -
    /// expiry is only ever reported for authentic tokens.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        let [header_b64, claims_b64, signature_b64] = parts.as_slice() else {
            return Err(TokenError::Malformed);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;

        // Constant-time comparison via Mac::verify_slice
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let header_json = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| TokenError::Malformed)?;
        let header: WireHeader =
            serde_json::from_slice(&header_json).map_err(|_| TokenError::Malformed)?;
        if header.alg != "HS256" {
            return Err(TokenError::Malformed);
        }

        let claims_json = URL_SAFE_NO_PAD
            .decode(claims_b64)
            .map_err(|_| TokenError::Malformed)?;
        let wire: WireClaims =
            serde_json::from_slice(&claims_json).map_err(|_| TokenError::Malformed)?;
        let roles = RoleSet::from_claim(&wire.roles).map_err(|_| TokenError::Malformed)?;

        if now.timestamp() >= wire.exp {
            return Err(TokenError::Expired);
        }

        Ok(Claims {
            sub: wire.sub,
            roles,
            iat: wire.iat,
            exp: wire.exp,
        })
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::role::Role;
    use chrono::TimeZone;

    const TTL: Duration = Duration::from_secs(3600);

    fn codec() -> TokenCodec {
        TokenCodec::new([7u8; 32], TTL)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_has_three_segments() {
        let token = codec().issue("alice", &RoleSet::single(Role::Reader), t0());
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_roundtrip_within_ttl() {
        let codec = codec();
        let roles = RoleSet::from_roles([Role::Author, Role::Reader]);
        let token = codec.issue("alice", &roles, t0());

        for delta in [0, 1, 1800, 3599] {
            let claims = codec
                .validate(&token, t0() + chrono::Duration::seconds(delta))
                .unwrap();
            assert_eq!(claims.sub, "alice");
            assert_eq!(claims.roles, roles);
            assert_eq!(claims.iat, t0().timestamp());
            assert_eq!(claims.exp, t0().timestamp() + 3600);
        }
    }

    #[test]
    fn test_expired_at_and_past_ttl() {
        let codec = codec();
        let token = codec.issue("alice", &RoleSet::single(Role::Reader), t0());

        for delta in [3600, 3601, 86400] {
            let result = codec.validate(&token, t0() + chrono::Duration::seconds(delta));
            assert_eq!(result, Err(TokenError::Expired));
        }
    }

    #[test]
    fn test_tampering_any_character_never_validates() {
        let codec = codec();
        let token = codec.issue("alice", &RoleSet::single(Role::Admin), t0());

        for i in 0..token.len() {
            let mut tampered: Vec<char> = token.chars().collect();
            tampered[i] = if tampered[i] == 'A' { 'B' } else { 'A' };
            let tampered: String = tampered.into_iter().collect();
            if tampered == token {
                continue;
            }

            let result = codec.validate(&tampered, t0());
            assert!(
                matches!(result, Err(TokenError::BadSignature) | Err(TokenError::Malformed)),
                "tampered index {i} validated: {result:?}"
            );
        }
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let token = codec().issue("alice", &RoleSet::single(Role::Reader), t0());
        let other = TokenCodec::new([8u8; 32], TTL);
        assert_eq!(other.validate(&token, t0()), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_structures() {
        let codec = codec();
        for garbage in ["", "abc", "a.b", "a.b.c.d", "!!.!!.!!"] {
            assert_eq!(codec.validate(garbage, t0()), Err(TokenError::Malformed));
        }
    }

    #[test]
    fn test_expiry_not_reported_for_forged_tokens() {
        // An expired but forged token must fail on the signature,
        // not leak that the claims parsed.
        let token = codec().issue("alice", &RoleSet::single(Role::Reader), t0());
        let other = TokenCodec::new([9u8; 32], TTL);
        let long_after = t0() + chrono::Duration::days(30);
        assert_eq!(
            other.validate(&token, long_after),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_empty_role_set_roundtrips() {
        let codec = codec();
        let token = codec.issue("ghost", &RoleSet::default(), t0());
        let claims = codec.validate(&token, t0()).unwrap();
        assert!(claims.roles.is_empty());
    }
}
