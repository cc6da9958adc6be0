//! Repository for the `officials` and `official_categories` tables.

use civic_core::types::DbId;
use sqlx::PgPool;

use crate::models::official::{CreateOfficial, Official};

const COLUMNS: &str = "id, user_id, reports_to, created_at";

/// Provides official profile lookups and category assignment.
///
/// Officials are provisioned by operators; there is no public sign-up path.
pub struct OfficialRepo;

impl OfficialRepo {
    /// Insert an official profile, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateOfficial) -> Result<Official, sqlx::Error> {
        let query = format!(
            "INSERT INTO officials (user_id, reports_to) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Official>(&query)
            .bind(input.user_id)
            .bind(input.reports_to)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Official>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM officials WHERE user_id = $1");
        sqlx::query_as::<_, Official>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Assign a category to an official. Assigning twice is a no-op.
    pub async fn assign_category(
        pool: &PgPool,
        official_id: DbId,
        category_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO official_categories (official_id, category_id) \
             VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(official_id)
        .bind(category_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Category IDs assigned to an official, ascending.
    pub async fn list_category_ids(
        pool: &PgPool,
        official_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT category_id FROM official_categories \
             WHERE official_id = $1 \
             ORDER BY category_id",
        )
        .bind(official_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
