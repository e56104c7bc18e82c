//! User Storage
//! Mission: Look up and manage user accounts with SQLite

use crate::auth::models::{AccountStatus, Role, User};
use anyhow::{Context, Result};
use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

/// Credential store with a SQLite backend. Opens a connection per call; the
/// auth core only ever reads from it at request time.
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                full_name TEXT,
                phone TEXT,
                avatar TEXT,
                role INTEGER NOT NULL,
                status INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        self.seed_default_superadmin(&conn)?;

        Ok(())
    }

    /// Seed a superadmin account for initial setup if none exists.
    fn seed_default_superadmin(&self, conn: &Connection) -> Result<()> {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM users WHERE role = ?1",
                params![Role::Superadmin.code()],
                |row| row.get(0),
            )
            .context("Failed to check for superadmin accounts")?;

        if count == 0 {
            let password_hash =
                hash("admin123", DEFAULT_COST).context("Failed to hash password")?;
            let now = Utc::now().to_rfc3339();

            conn.execute(
                "INSERT INTO users (email, password_hash, full_name, role, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    "admin@classhub.local",
                    password_hash,
                    "Default Superadmin",
                    Role::Superadmin.code(),
                    AccountStatus::Active.code(),
                    now,
                    now,
                ],
            )
            .context("Failed to insert superadmin account")?;

            info!("🔐 Default superadmin created (email: admin@classhub.local, password: admin123)");
            warn!("⚠️  CHANGE DEFAULT PASSWORD IN PRODUCTION!");
        }

        Ok(())
    }

    /// Look up an account by email. Role and status come back as raw codes;
    /// decoding them is the gate's job so corruption fails loudly there.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, email, password_hash, full_name, phone, avatar, role, status, created_at, updated_at
             FROM users WHERE email = ?1",
        )?;

        let user = stmt
            .query_row(params![email], |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                    full_name: row.get(3)?,
                    phone: row.get(4)?,
                    avatar: row.get(5)?,
                    role: row.get(6)?,
                    status: row.get(7)?,
                    created_at: row.get(8)?,
                    updated_at: row.get(9)?,
                })
            })
            .optional()?;

        Ok(user)
    }

    /// Create a new account with a bcrypt-hashed password.
    pub fn create_user(
        &self,
        email: &str,
        password: &str,
        role: Role,
        status: AccountStatus,
    ) -> Result<User> {
        let password_hash = hash(password, DEFAULT_COST).context("Failed to hash password")?;
        let now = Utc::now().to_rfc3339();

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO users (email, password_hash, role, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                email,
                password_hash,
                role.code(),
                status.code(),
                now,
                now,
            ],
        )
        .context("Failed to insert user")?;

        let id = conn.last_insert_rowid();

        info!("✅ Created user: {} ({})", email, role.as_str());

        Ok(User {
            id,
            email: email.to_string(),
            password_hash,
            full_name: None,
            phone: None,
            avatar: None,
            role: role.code(),
            status: status.code(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Overwrite the raw role code of an account. Intentionally accepts any
    /// integer so corrupt data paths can be exercised in tests.
    #[cfg(test)]
    pub fn set_raw_role(&self, email: &str, role_code: i64) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "UPDATE users SET role = ?1 WHERE email = ?2",
            params![role_code, email],
        )?;
        Ok(())
    }
}
