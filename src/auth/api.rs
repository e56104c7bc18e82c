//! Authentication API Endpoints
//! Mission: Provide the login endpoint and current-user lookup

use crate::auth::gate::{AuthError, AuthGate};
use crate::auth::middleware::extract_principal;
use crate::auth::models::{LoginRequest, TokenResponse};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Uniform response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    pub timestamp: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            message: "Success".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<serde_json::Value> {
    pub fn error(message: &str) -> Self {
        Self {
            status: "error".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            message: message.to_string(),
            data: None,
        }
    }
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(gate): State<Arc<AuthGate>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    info!("🔐 Login attempt: {}", payload.email);

    let tokens = gate.login(&payload.email, &payload.password)?;

    info!("✅ Login successful: {} ({})", payload.email, tokens.role);

    Ok(Json(ApiResponse::success(tokens)))
}

/// Current-user info carried in the response of GET /api/auth/me. Built from
/// the validated token only, no database lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    pub user_id: i64,
    pub email: String,
    pub role: String,
    pub authority: String,
}

/// Get current user info - GET /api/auth/me (protected)
pub async fn get_current_user(
    req: Request,
) -> Result<Json<ApiResponse<PrincipalResponse>>, ApiError> {
    let principal = extract_principal(&req).ok_or(ApiError::Unauthenticated)?;

    Ok(Json(ApiResponse::success(PrincipalResponse {
        user_id: principal.user_id,
        email: principal.email.clone(),
        role: principal.role.as_str().to_string(),
        authority: principal.authority.clone(),
    })))
}

/// Public-facing error outcomes. Everything the gate can report is collapsed
/// here: credential failures (including data-integrity ones) become one
/// generic login rejection, token failures one generic unauthenticated
/// response. Which sub-check failed never crosses the wire.
#[derive(Debug)]
pub enum ApiError {
    InvalidCredentials,
    MissingToken,
    Unauthenticated,
    InternalError,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::DataIntegrity(_) => {
                ApiError::InvalidCredentials
            }
            AuthError::InvalidToken | AuthError::ExpiredToken => ApiError::Unauthenticated,
            AuthError::Internal(msg) => {
                error!("Internal auth error: {}", msg);
                ApiError::InternalError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            ApiError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            ApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::IntegrityError;

    #[test]
    fn test_api_error_status_codes() {
        let invalid_creds = ApiError::InvalidCredentials.into_response();
        assert_eq!(invalid_creds.status(), StatusCode::UNAUTHORIZED);

        let missing = ApiError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let unauthenticated = ApiError::Unauthenticated.into_response();
        assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

        let internal = ApiError::InternalError.into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_gate_errors_collapse_to_public_outcomes() {
        // Credential-side failures all become the generic login rejection.
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::InvalidCredentials
        ));
        assert!(matches!(
            ApiError::from(AuthError::DataIntegrity(IntegrityError::RoleCode(9))),
            ApiError::InvalidCredentials
        ));

        // Token-side failures all become the generic unauthenticated outcome.
        assert!(matches!(
            ApiError::from(AuthError::InvalidToken),
            ApiError::Unauthenticated
        ));
        assert!(matches!(
            ApiError::from(AuthError::ExpiredToken),
            ApiError::Unauthenticated
        ));
    }

    #[test]
    fn test_envelope_shapes() {
        let ok = ApiResponse::success(serde_json::json!({"k": "v"}));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json.get("data").is_some());

        let err = ApiResponse::error("Invalid email or password");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Invalid email or password");
        assert!(json.get("data").is_none());
    }
}
