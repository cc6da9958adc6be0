//! Official profile model.

use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `officials` table.
///
/// Whether this is a regular or a higher official is decided by the owning
/// user's role, not by `reports_to`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Official {
    pub id: DbId,
    pub user_id: DbId,
    pub reports_to: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for provisioning an official profile.
#[derive(Debug)]
pub struct CreateOfficial {
    pub user_id: DbId,
    pub reports_to: Option<DbId>,
}
