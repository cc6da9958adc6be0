//! Request handlers.
//!
//! Handlers parse the request, resolve the caller, and delegate to the
//! [`IssueWorkflow`](civic_workflow::IssueWorkflow) engine. Account handlers
//! talk to the repositories directly.

pub mod attachments;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod form;
pub mod issues;
