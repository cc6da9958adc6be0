//! Repository for the `users` table.

use civic_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};
use crate::DbTx;

/// Column list for `users` queries.
const COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// Provides account lookups and inserts.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user inside an open transaction, returning the full row.
    ///
    /// Fails with a unique violation on `uq_users_email` if the email exists.
    pub async fn create(tx: &mut DbTx<'_>, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
