//! Role names and the resolved actor model.
//!
//! The role string stored on `users.role` is the only thing that decides
//! whether someone is a citizen, an official, or a higher official. An
//! official's `reports_to` link is organisational and never implies a role.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// These must match the `CHECK` constraint on `users.role`.
pub const ROLE_CITIZEN: &str = "citizen";
pub const ROLE_OFFICIAL: &str = "official";
pub const ROLE_HIGHER_OFFICIAL: &str = "higher_official";

/// Role carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Official,
    HigherOfficial,
}

impl Role {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_CITIZEN => Ok(Self::Citizen),
            ROLE_OFFICIAL => Ok(Self::Official),
            ROLE_HIGHER_OFFICIAL => Ok(Self::HigherOfficial),
            _ => Err(CoreError::validation(
                "role",
                format!("Invalid role '{s}'. Must be one of: citizen, official, higher_official"),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Citizen => ROLE_CITIZEN,
            Self::Official => ROLE_OFFICIAL,
            Self::HigherOfficial => ROLE_HIGHER_OFFICIAL,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The categories a higher official may act upon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "category_ids", rename_all = "snake_case")]
pub enum Scope {
    Global,
    Categories(BTreeSet<DbId>),
}

impl Scope {
    /// An empty assignment list means global scope.
    pub fn from_assignments(category_ids: impl IntoIterator<Item = DbId>) -> Self {
        let set: BTreeSet<DbId> = category_ids.into_iter().collect();
        if set.is_empty() {
            Self::Global
        } else {
            Self::Categories(set)
        }
    }

    pub fn covers(&self, category_id: DbId) -> bool {
        match self {
            Self::Global => true,
            Self::Categories(set) => set.contains(&category_id),
        }
    }
}

/// An authenticated caller resolved to their role-specific profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Actor {
    Citizen {
        user_id: DbId,
        citizen_id: DbId,
    },
    Official {
        user_id: DbId,
        official_id: DbId,
        categories: BTreeSet<DbId>,
    },
    HigherOfficial {
        user_id: DbId,
        official_id: DbId,
        scope: Scope,
    },
}

impl Actor {
    pub fn user_id(&self) -> DbId {
        match self {
            Self::Citizen { user_id, .. }
            | Self::Official { user_id, .. }
            | Self::HigherOfficial { user_id, .. } => *user_id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Citizen { .. } => Role::Citizen,
            Self::Official { .. } => Role::Official,
            Self::HigherOfficial { .. } => Role::HigherOfficial,
        }
    }
}
