//! Repository for the `issues` table.

use civic_core::access::ListScope;
use civic_core::issue_status::IssueStatus;
use civic_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::issue::{CreateIssue, Issue, IssueSummary, OverdueIssue};
use crate::DbTx;

/// Column list for `issues` queries.
const COLUMNS: &str = "\
    id, citizen_id, category_id, title, description, status, version, \
    created_by, updated_by, created_at, updated_at";

/// Column list for the issue + category projection. Expects aliases `i`/`c`.
const SUMMARY_COLUMNS: &str = "\
    i.id, i.citizen_id, i.category_id, c.name AS category, c.priority, \
    i.title, i.description, i.status, i.created_at, i.updated_at";

/// Builds the `WHERE` conditions for a scoped issue query against alias `i`.
///
/// Placeholders are numbered from `*param_idx`, which is advanced past the
/// last one used. Callers must bind in the same order: citizen id, category
/// ids, status.
pub(crate) fn scope_conditions(
    scope: &ListScope,
    status: Option<IssueStatus>,
    param_idx: &mut usize,
) -> Vec<String> {
    let mut conditions: Vec<String> = Vec::new();

    if scope.citizen_id.is_some() {
        conditions.push(format!("i.citizen_id = ${param_idx}"));
        *param_idx += 1;
    }
    if scope.category_ids.is_some() {
        conditions.push(format!("i.category_id = ANY(${param_idx})"));
        *param_idx += 1;
    }
    if status.is_some() {
        conditions.push(format!("i.status = ${param_idx}"));
        *param_idx += 1;
    }
    if scope.exclude_escalated {
        conditions.push("i.status <> 'escalated'".to_string());
    }

    conditions
}

pub(crate) fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// Provides issue persistence. `citizen_id` is never updated.
pub struct IssueRepo;

impl IssueRepo {
    /// Insert a new issue in `created` status, returning the full row.
    pub async fn create(tx: &mut DbTx<'_>, input: &CreateIssue) -> Result<Issue, sqlx::Error> {
        let query = format!(
            "INSERT INTO issues (citizen_id, category_id, title, description, status, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(input.citizen_id)
            .bind(input.category_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(IssueStatus::Created.as_str())
            .bind(input.created_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find an issue by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Issue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issues WHERE id = $1");
        sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an issue joined with its category.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<IssueSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM issues i \
             JOIN issue_categories c ON c.id = i.category_id \
             WHERE i.id = $1"
        );
        sqlx::query_as::<_, IssueSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Compare-and-swap the status of an issue.
    ///
    /// The row is only updated while both its status and its version still
    /// match what the caller read, and the version is bumped on success.
    /// Matching on status alone is not enough: `in_progress -> in_progress`
    /// leaves the status as it was. Returns `None` when the issue is missing
    /// or has been written since; callers that already know the issue exists
    /// treat `None` as a concurrent modification.
    pub async fn update_status(
        tx: &mut DbTx<'_>,
        id: DbId,
        new_status: IssueStatus,
        expected_status: IssueStatus,
        expected_version: i64,
        updated_by: DbId,
    ) -> Result<Option<Issue>, sqlx::Error> {
        let query = format!(
            "UPDATE issues \
             SET status = $1, version = version + 1, updated_by = $2, updated_at = NOW() \
             WHERE id = $3 AND status = $4 AND version = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(new_status.as_str())
            .bind(updated_by)
            .bind(id)
            .bind(expected_status.as_str())
            .bind(expected_version)
            .fetch_optional(&mut **tx)
            .await
    }

    /// List issues visible under `scope`, newest first, with the total count
    /// of matching rows.
    pub async fn list_scoped(
        pool: &PgPool,
        scope: &ListScope,
        status: Option<IssueStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<IssueSummary>, i64), sqlx::Error> {
        let mut param_idx: usize = 1;
        let conditions = scope_conditions(scope, status, &mut param_idx);
        let where_sql = where_clause(&conditions);

        let count_query = format!("SELECT COUNT(*) FROM issues i {where_sql}");
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(citizen_id) = scope.citizen_id {
            count_q = count_q.bind(citizen_id);
        }
        if let Some(ids) = &scope.category_ids {
            count_q = count_q.bind(ids.clone());
        }
        if let Some(s) = status {
            count_q = count_q.bind(s.as_str());
        }
        let total = count_q.fetch_one(pool).await?;

        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM issues i \
             JOIN issue_categories c ON c.id = i.category_id \
             {where_sql} \
             ORDER BY i.created_at DESC, i.id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );
        let mut q = sqlx::query_as::<_, IssueSummary>(&query);
        if let Some(citizen_id) = scope.citizen_id {
            q = q.bind(citizen_id);
        }
        if let Some(ids) = &scope.category_ids {
            q = q.bind(ids.clone());
        }
        if let Some(s) = status {
            q = q.bind(s.as_str());
        }
        q = q.bind(limit).bind(offset);

        let rows = q.fetch_all(pool).await?;
        Ok((rows, total))
    }

    /// `created` issues whose category waiting period has elapsed at `now`,
    /// oldest first.
    pub async fn find_overdue_created(
        pool: &PgPool,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<OverdueIssue>, sqlx::Error> {
        sqlx::query_as::<_, OverdueIssue>(
            "SELECT i.id, i.created_by FROM issues i \
             JOIN issue_categories c ON c.id = i.category_id \
             WHERE i.status = 'created' \
               AND i.created_at + COALESCE(NULLIF(c.escalate_after_hours, 0), 72) \
                   * INTERVAL '1 hour' <= $1 \
             ORDER BY i.created_at ASC \
             LIMIT $2",
        )
        .bind(now)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
