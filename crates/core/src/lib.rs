//! Domain rules for the civic issue desk.
//!
//! Everything in this crate is pure: no database, no HTTP. The workflow
//! engine and the API layer call into these modules to decide whether an
//! operation is allowed before touching storage.

pub mod access;
pub mod error;
pub mod escalation;
pub mod issue_status;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod validation;
