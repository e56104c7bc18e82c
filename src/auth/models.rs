//! Authentication Models
//! Mission: Define user, role, and token data structures

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a role or status code read from storage (or a role name read
/// from a token) does not belong to the closed set. Never coerced to a
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("unknown role code: {0}")]
    RoleCode(i64),
    #[error("unknown role name: {0:?}")]
    RoleName(String),
    #[error("unknown account status code: {0}")]
    StatusCode(i64),
}

/// User roles for RBAC. Stored as integer codes, carried in tokens by name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "STUDENT")]
    Student, // 0
    #[serde(rename = "TEACHER")]
    Teacher, // 1
    #[serde(rename = "ADMIN")]
    Admin, // 2
    #[serde(rename = "SUPERADMIN")]
    Superadmin, // 3
    #[serde(rename = "SUPPORT")]
    Support, // 4
}

impl Role {
    pub fn code(&self) -> i64 {
        match self {
            Role::Student => 0,
            Role::Teacher => 1,
            Role::Admin => 2,
            Role::Superadmin => 3,
            Role::Support => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Teacher => "TEACHER",
            Role::Admin => "ADMIN",
            Role::Superadmin => "SUPERADMIN",
            Role::Support => "SUPPORT",
        }
    }

    pub fn from_code(code: i64) -> Result<Self, IntegrityError> {
        match code {
            0 => Ok(Role::Student),
            1 => Ok(Role::Teacher),
            2 => Ok(Role::Admin),
            3 => Ok(Role::Superadmin),
            4 => Ok(Role::Support),
            other => Err(IntegrityError::RoleCode(other)),
        }
    }

    pub fn from_name(name: &str) -> Result<Self, IntegrityError> {
        match name {
            "STUDENT" => Ok(Role::Student),
            "TEACHER" => Ok(Role::Teacher),
            "ADMIN" => Ok(Role::Admin),
            "SUPERADMIN" => Ok(Role::Superadmin),
            "SUPPORT" => Ok(Role::Support),
            other => Err(IntegrityError::RoleName(other.to_string())),
        }
    }

    /// Granted-capability label for this role, with the fixed `ROLE_` prefix
    /// marking it as role-based. Total and deterministic.
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.as_str())
    }
}

/// Account status. Only `Active` accounts may authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Disabled, // 0
    Active,   // 1
    Locked,   // 2
}

impl AccountStatus {
    pub fn code(&self) -> i64 {
        match self {
            AccountStatus::Disabled => 0,
            AccountStatus::Active => 1,
            AccountStatus::Locked => 2,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, IntegrityError> {
        match code {
            0 => Ok(AccountStatus::Disabled),
            1 => Ok(AccountStatus::Active),
            2 => Ok(AccountStatus::Locked),
            other => Err(IntegrityError::StatusCode(other)),
        }
    }
}

/// Persisted user account. Read-only from the auth core's perspective; role
/// and status are kept as raw codes so that decoding (and failing loudly on
/// corruption) happens in the gate, not in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub role: i64,
    pub status: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// JWT claims payload. `iat`/`exp` are epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String, // subject (email)
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub role: String, // role name, e.g. "ADMIN"
    pub iat: i64,
    pub exp: i64,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair returned after a successful login. Expiry fields are absolute
/// epoch millis so the client knows when to refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expiry_at: i64,
    pub refresh_token_expiry_at: i64,
    pub role: String,
}

/// Identity of an authenticated request, built from validated token claims
/// only. This is deliberately not the persisted `User`: the store record and
/// the in-request principal are separate types.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    pub authority: String,
}

impl AuthenticatedUser {
    pub fn new(user_id: i64, email: String, role: Role) -> Self {
        let authority = role.authority();
        Self {
            user_id,
            email,
            role,
            authority,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_code_name_bijection() {
        for code in 0..=4 {
            let role = Role::from_code(code).unwrap();
            assert_eq!(role.code(), code);
            assert_eq!(Role::from_name(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_code_rejected() {
        assert_eq!(Role::from_code(5), Err(IntegrityError::RoleCode(5)));
        assert_eq!(Role::from_code(-1), Err(IntegrityError::RoleCode(-1)));
        assert_eq!(Role::from_code(99), Err(IntegrityError::RoleCode(99)));
    }

    #[test]
    fn test_unknown_role_name_rejected() {
        assert!(Role::from_name("admin").is_err()); // names are case-sensitive
        assert!(Role::from_name("WIZARD").is_err());
        assert!(Role::from_name("").is_err());
    }

    #[test]
    fn test_role_serialization_uses_canonical_names() {
        let json = serde_json::to_string(&Role::Superadmin).unwrap();
        assert_eq!(json, r#""SUPERADMIN""#);

        let role: Role = serde_json::from_str(r#""TEACHER""#).unwrap();
        assert_eq!(role, Role::Teacher);
    }

    #[test]
    fn test_role_authority_prefix() {
        assert_eq!(Role::Admin.authority(), "ROLE_ADMIN");
        assert_eq!(Role::Student.authority(), "ROLE_STUDENT");
    }

    #[test]
    fn test_account_status_codes() {
        assert_eq!(AccountStatus::from_code(0).unwrap(), AccountStatus::Disabled);
        assert_eq!(AccountStatus::from_code(1).unwrap(), AccountStatus::Active);
        assert_eq!(AccountStatus::from_code(2).unwrap(), AccountStatus::Locked);
        assert_eq!(
            AccountStatus::from_code(7),
            Err(IntegrityError::StatusCode(7))
        );
    }

    #[test]
    fn test_token_response_wire_shape() {
        let resp = TokenResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            access_token_expiry_at: 1,
            refresh_token_expiry_at: 2,
            role: "ADMIN".to_string(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_some());
        assert!(json.get("accessTokenExpiryAt").is_some());
        assert!(json.get("refreshTokenExpiryAt").is_some());
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = User {
            id: 1,
            email: "a@b.c".to_string(),
            password_hash: "secret-hash".to_string(),
            full_name: None,
            phone: None,
            avatar: None,
            role: 2,
            status: 1,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
