//! Repository for the `issue_categories` table.

use civic_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{CreateCategory, IssueCategory};

const COLUMNS: &str = "id, name, priority, escalate_after_hours, \
    expected_resolution_hours, is_active, created_at";

pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category. Priority defaults to `medium`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCategory,
    ) -> Result<IssueCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO issue_categories \
                (name, priority, escalate_after_hours, expected_resolution_hours) \
             VALUES ($1, COALESCE($2, 'medium'), $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueCategory>(&query)
            .bind(&input.name)
            .bind(&input.priority)
            .bind(input.escalate_after_hours)
            .bind(input.expected_resolution_hours)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<IssueCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issue_categories WHERE id = $1");
        sqlx::query_as::<_, IssueCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active categories ordered by name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<IssueCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM issue_categories WHERE is_active ORDER BY name ASC"
        );
        sqlx::query_as::<_, IssueCategory>(&query)
            .fetch_all(pool)
            .await
    }

    /// Mark a category inactive. Returns `true` if a row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE issue_categories SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
