//! Citizen profile model.

use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `citizens` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Citizen {
    pub id: DbId,
    pub user_id: DbId,
    pub phone: String,
    pub address: String,
    pub created_at: Timestamp,
}

/// DTO for creating a citizen profile.
#[derive(Debug)]
pub struct CreateCitizen {
    pub user_id: DbId,
    pub phone: String,
    pub address: String,
}
