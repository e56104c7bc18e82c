//! JWT Token Service
//! Mission: Mint and validate signed access/refresh tokens

use crate::auth::models::Claims;
use anyhow::{ensure, Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::debug;

/// Errors raised by token parsing. `Invalid` covers malformed structure,
/// signature mismatch, and decoding failures without distinguishing them;
/// `Expired` is only raised for correctly signed tokens past their expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("expired token")]
    Expired,
}

/// Token service for HS256 JWT operations. Sole owner of the signing secret.
///
/// Access and refresh tokens share one builder and differ only in TTL. Both
/// TTLs come from configuration and are immutable for the process lifetime.
pub struct TokenService {
    secret: String,
    access_ttl_ms: i64,
    refresh_ttl_ms: i64,
}

impl TokenService {
    pub fn new(secret: String, access_ttl_ms: i64, refresh_ttl_ms: i64) -> Self {
        Self {
            secret,
            access_ttl_ms,
            refresh_ttl_ms,
        }
    }

    /// Generate a short-lived access token for (email, user id, role name).
    pub fn issue_access_token(&self, email: &str, user_id: i64, role: &str) -> Result<String> {
        self.build_token(email, user_id, role, self.access_ttl_ms)
    }

    /// Generate a long-lived refresh token for (email, user id, role name).
    pub fn issue_refresh_token(&self, email: &str, user_id: i64, role: &str) -> Result<String> {
        self.build_token(email, user_id, role, self.refresh_ttl_ms)
    }

    /// Shared builder: stamps iat = now, exp = now + ttl, embeds the userId
    /// and role claims, signs with HMAC-SHA256.
    ///
    /// Email format is the caller's concern; only non-emptiness is enforced
    /// here.
    fn build_token(&self, email: &str, user_id: i64, role: &str, ttl_ms: i64) -> Result<String> {
        ensure!(!email.is_empty(), "token subject (email) must be non-empty");
        ensure!(!role.is_empty(), "token role must be non-empty");

        let now_ms = Utc::now().timestamp_millis();
        let claims = Claims {
            sub: email.to_string(),
            user_id,
            role: role.to_string(),
            iat: now_ms / 1000,
            exp: (now_ms + ttl_ms) / 1000,
        };

        debug!(email, user_id, role, ttl_ms, "Issuing token");

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    /// Verify the signature and decode the claims. The signature is checked
    /// before any claim is read; expiry is NOT enforced here, so an
    /// expired-but-validly-signed token still parses and stays
    /// distinguishable from a forged one.
    pub fn parse_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| TokenError::Invalid)
    }

    /// Like `parse_claims`, but additionally rejects expired tokens with
    /// `TokenError::Expired`. This is the request-authorization entry point.
    pub fn parse_fresh_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.parse_claims(token)?;
        if claims.exp * 1000 < Utc::now().timestamp_millis() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// Extract the subject (email).
    pub fn extract_email(&self, token: &str) -> Result<String, TokenError> {
        self.parse_claims(token).map(|c| c.sub)
    }

    /// Extract the userId claim.
    pub fn extract_user_id(&self, token: &str) -> Result<i64, TokenError> {
        self.parse_claims(token).map(|c| c.user_id)
    }

    /// Extract the role claim (role name).
    pub fn extract_role(&self, token: &str) -> Result<String, TokenError> {
        self.parse_claims(token).map(|c| c.role)
    }

    /// Extract the expiry timestamp in epoch millis.
    pub fn extract_expiration(&self, token: &str) -> Result<i64, TokenError> {
        self.parse_claims(token).map(|c| c.exp * 1000)
    }

    /// True iff the token's expiry is strictly before now. Requires a valid
    /// signature; evaluated independently of any other claim.
    pub fn is_expired(&self, token: &str) -> Result<bool, TokenError> {
        let claims = self.parse_claims(token)?;
        Ok(claims.exp * 1000 < Utc::now().timestamp_millis())
    }

    /// Predicate: signature verifies AND the subject matches `email` AND the
    /// token is not expired. Never errors; any failure yields false.
    pub fn validate(&self, token: &str, email: &str) -> bool {
        match self.parse_claims(token) {
            Ok(claims) => {
                claims.sub == email && claims.exp * 1000 >= Utc::now().timestamp_millis()
            }
            Err(_) => false,
        }
    }

    /// Absolute epoch millis at which an access token issued now will expire.
    pub fn access_expiry_timestamp(&self) -> i64 {
        Utc::now().timestamp_millis() + self.access_ttl_ms
    }

    /// Absolute epoch millis at which a refresh token issued now will expire.
    pub fn refresh_expiry_timestamp(&self) -> i64 {
        Utc::now().timestamp_millis() + self.refresh_ttl_ms
    }
}
