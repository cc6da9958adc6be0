//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Reads take `&PgPool`; writes that belong to a larger unit of work take a
//! [`DbTx`](crate::DbTx) so the caller decides when to commit.

pub mod attachment_repo;
pub mod category_repo;
pub mod citizen_repo;
pub mod comment_repo;
pub mod dashboard_repo;
pub mod issue_repo;
pub mod official_repo;
pub mod user_repo;

pub use attachment_repo::AttachmentRepo;
pub use category_repo::CategoryRepo;
pub use citizen_repo::CitizenRepo;
pub use comment_repo::CommentRepo;
pub use dashboard_repo::DashboardRepo;
pub use issue_repo::IssueRepo;
pub use official_repo::OfficialRepo;
pub use user_repo::UserRepo;
