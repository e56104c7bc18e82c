//! Authentication Middleware
//! Mission: Protect API endpoints with bearer-token validation

use crate::auth::api::ApiError;
use crate::auth::gate::AuthGate;
use crate::auth::models::AuthenticatedUser;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Middleware that validates the bearer token on every protected request.
///
/// On success the derived `AuthenticatedUser` is inserted into the request
/// extensions for downstream handlers; otherwise the request is rejected at
/// the boundary and no identity is made available.
pub async fn auth_middleware(
    State(gate): State<Arc<AuthGate>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or(ApiError::MissingToken)?;

    let principal = gate
        .authorize(&token)
        .map_err(|_| ApiError::Unauthenticated)?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Extract the authenticated principal from a request (use after
/// `auth_middleware`).
pub fn extract_principal(req: &Request) -> Option<&AuthenticatedUser> {
    req.extensions().get::<AuthenticatedUser>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use axum::{body::Body, http::Request as HttpRequest};

    #[test]
    fn test_extract_principal_from_request() {
        let mut req = HttpRequest::new(Body::empty());

        // No principal until the middleware inserts one.
        assert!(extract_principal(&req).is_none());

        let principal = AuthenticatedUser::new(7, "test@example.com".to_string(), Role::Teacher);
        req.extensions_mut().insert(principal);

        let extracted = extract_principal(&req).unwrap();
        assert_eq!(extracted.user_id, 7);
        assert_eq!(extracted.email, "test@example.com");
        assert_eq!(extracted.authority, "ROLE_TEACHER");
    }
}
