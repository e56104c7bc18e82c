//! Application configuration
//! Mission: Collect all runtime settings from the environment once, at startup

use anyhow::ensure;

/// Immutable process configuration, loaded once and shared via `Arc`.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub access_ttl_ms: i64,
    pub refresh_ttl_ms: i64,
    pub db_path: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-in-production-minimum-32-characters".to_string());
        ensure!(
            jwt_secret.len() >= 32,
            "JWT_SECRET must be at least 32 bytes for HMAC-SHA256"
        );

        // TTLs in milliseconds: 15 minutes / 7 days by default.
        let access_ttl_ms = std::env::var("JWT_ACCESS_EXPIRATION_MS")
            .unwrap_or_else(|_| "900000".to_string())
            .parse()
            .unwrap_or(900_000);

        let refresh_ttl_ms = std::env::var("JWT_REFRESH_EXPIRATION_MS")
            .unwrap_or_else(|_| "604800000".to_string())
            .parse()
            .unwrap_or(604_800_000);

        let db_path = std::env::var("AUTH_DB_PATH")
            .unwrap_or_else(|_| "classhub_auth.db".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:5175".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            jwt_secret,
            access_ttl_ms,
            refresh_ttl_ms,
            db_path,
            port,
            allowed_origins,
        })
    }
}
