//! Repository for the `citizens` table.

use civic_core::types::DbId;
use sqlx::PgPool;

use crate::models::citizen::{Citizen, CreateCitizen};
use crate::DbTx;

const COLUMNS: &str = "id, user_id, phone, address, created_at";

pub struct CitizenRepo;

impl CitizenRepo {
    /// Insert a citizen profile inside an open transaction.
    pub async fn create(tx: &mut DbTx<'_>, input: &CreateCitizen) -> Result<Citizen, sqlx::Error> {
        let query = format!(
            "INSERT INTO citizens (user_id, phone, address) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Citizen>(&query)
            .bind(input.user_id)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Citizen>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM citizens WHERE user_id = $1");
        sqlx::query_as::<_, Citizen>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
