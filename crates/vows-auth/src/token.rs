//! JWT session token issuance/verification and random slug generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vows_core::models::user::{User, UserRole};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: user ID (UUID string).
    pub sub: String,
    /// Tenant ID (UUID string).
    pub tenant_id: String,
    pub role: UserRole,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique token ID (UUID string).
    pub jti: String,
}

/// The authenticated caller, as seen by request handlers.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: UserRole,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Issue a signed EdDSA (Ed25519) session token for `user`.
pub fn issue_session_token(user: &User, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user.id.to_string(),
        tenant_id: user.tenant_id.to_string(),
        role: user.role,
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now + config.session_lifetime_secs as i64,
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_ed_pem(config.jwt_private_key_pem.as_bytes())
        .map_err(|e| AuthError::Crypto(format!("bad private key: {e}")))?;

    let header = Header::new(Algorithm::EdDSA);
    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify an EdDSA session token.
pub fn decode_session_token(token: &str, config: &AuthConfig) -> Result<SessionClaims, AuthError> {
    let key = DecodingKey::from_ed_pem(config.jwt_public_key_pem.as_bytes())
        .map_err(|e| AuthError::Crypto(format!("bad public key: {e}")))?;

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

    jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Validate a session token and return the caller's session.
///
/// Stateless: no database lookup is performed.
pub fn validate_session_token(token: &str, config: &AuthConfig) -> Result<Session, AuthError> {
    let claims = decode_session_token(token, config)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|e| AuthError::TokenInvalid(format!("bad sub: {e}")))?;
    let tenant_id = Uuid::parse_str(&claims.tenant_id)
        .map_err(|e| AuthError::TokenInvalid(format!("bad tenant_id: {e}")))?;
    Ok(Session {
        user_id,
        tenant_id,
        role: claims.role,
    })
}

/// Random URL-safe slug (12 bytes → 16 base64url chars, no padding).
pub fn generate_slug() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 12] = rand::Rng::random(&mut rng);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare the secret presented by the identity provider with the
/// configured one. Always false when no secret is configured.
pub fn verify_provider_secret(presented: &str, config: &AuthConfig) -> bool {
    let Some(expected) = config.provider_secret.as_deref() else {
        return false;
    };
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
