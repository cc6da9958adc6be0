//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.
//! - [`actor::CurrentActor`] -- the caller resolved to their role profile.

pub mod actor;
pub mod auth;
