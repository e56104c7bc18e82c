//! Authentication Gate
//! Mission: Turn credentials into token pairs and bearer tokens into principals

use crate::auth::jwt::{TokenError, TokenService};
use crate::auth::models::{
    AccountStatus, AuthenticatedUser, IntegrityError, Role, TokenResponse,
};
use crate::auth::user_store::UserStore;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

/// Internal error taxonomy. The HTTP boundary collapses these into two public
/// outcomes (generic login failure, generic unauthenticated); the distinctions
/// exist for logging and for callers that want to prompt a refresh instead of
/// a re-login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("expired token")]
    ExpiredToken,
    #[error("data integrity violation: {0}")]
    DataIntegrity(#[from] IntegrityError),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Orchestrates login and request authorization on top of the credential
/// store and the token service. Stateless; every call is independent.
pub struct AuthGate {
    store: Arc<UserStore>,
    tokens: Arc<TokenService>,
}

impl AuthGate {
    pub fn new(store: Arc<UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Authenticate an (email, password) pair and mint a token pair.
    ///
    /// Every credential failure collapses to `InvalidCredentials`: a missing
    /// account, a wrong password, and a disabled or locked account are
    /// indistinguishable to the caller.
    pub fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self
            .store
            .find_by_email(email)
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or_else(|| {
                warn!("❌ Failed login attempt (unknown account): {}", email);
                AuthError::InvalidCredentials
            })?;

        let password_ok = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !password_ok {
            warn!("❌ Failed login attempt (bad password): {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let status = AccountStatus::from_code(user.status).map_err(|e| {
            error!("🛑 Corrupt account status for {}: {}", email, e);
            AuthError::DataIntegrity(e)
        })?;
        if status != AccountStatus::Active {
            warn!("❌ Login refused for non-active account: {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let role = Role::from_code(user.role).map_err(|e| {
            error!("🛑 Corrupt role code for {}: {}", email, e);
            AuthError::DataIntegrity(e)
        })?;
        let role_name = role.as_str();

        let access_token = self
            .tokens
            .issue_access_token(&user.email, user.id, role_name)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let refresh_token = self
            .tokens
            .issue_refresh_token(&user.email, user.id, role_name)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            access_token_expiry_at: self.tokens.access_expiry_timestamp(),
            refresh_token_expiry_at: self.tokens.refresh_expiry_timestamp(),
            role: role_name.to_string(),
        })
    }

    /// Validate a presented bearer token and derive the request's principal.
    ///
    /// Signature is verified before anything else; expiry is reported as
    /// `ExpiredToken` so callers can distinguish "refresh" from "re-login"
    /// internally. A signed token carrying an unknown role name is rejected
    /// as invalid rather than mapped to any default capability.
    pub fn authorize(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.tokens.parse_fresh_claims(token).map_err(|e| match e {
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::Invalid => AuthError::InvalidToken,
        })?;

        let role = Role::from_name(&claims.role).map_err(|e| {
            warn!("❌ Token carried unknown role: {}", e);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(claims.user_id, claims.sub, role))
    }
}
