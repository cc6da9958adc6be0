//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - Joined projections where handlers need more than one table

pub mod attachment;
pub mod category;
pub mod citizen;
pub mod comment;
pub mod dashboard;
pub mod issue;
pub mod official;
pub mod user;
