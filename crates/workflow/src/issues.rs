//! Filing and reading issues.

use std::collections::HashMap;

use civic_core::access::{self, ListScope};
use civic_core::error::CoreError;
use civic_core::issue_status::IssueStatus;
use civic_core::pagination::{self, Page};
use civic_core::roles::Actor;
use civic_core::types::DbId;
use civic_core::validation;
use civic_db::models::attachment::{Attachment, AttachmentBlob, CreateAttachment};
use civic_db::models::category::IssueCategory;
use civic_db::models::comment::CommentWithAuthor;
use civic_db::models::issue::{CreateIssue, IssueSummary};
use civic_db::repositories::{AttachmentRepo, CategoryRepo, CommentRepo, IssueRepo};
use civic_db::DbTx;
use serde::Serialize;

use crate::{IssueWorkflow, WorkflowResult};

const ENTITY_ISSUE: &str = "Issue";
const ENTITY_ATTACHMENT: &str = "Attachment";

/// An uploaded file that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub filename: String,
    pub mimetype: String,
    pub data: Vec<u8>,
}

/// Input for filing an issue.
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub category_id: DbId,
    pub title: Option<String>,
    pub description: String,
    pub attachments: Vec<NewAttachment>,
}

/// An issue with its category and the files filed alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct IssueDetail {
    #[serde(flatten)]
    pub issue: IssueSummary,
    pub attachments: Vec<Attachment>,
}

/// A comment with its author and attached files.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: CommentWithAuthor,
    pub attachments: Vec<Attachment>,
}

/// Check the number and size of uploaded files.
pub(crate) fn validate_uploads(files: &[NewAttachment], max_bytes: usize) -> Result<(), CoreError> {
    validation::validate_attachment_count(files.len())?;
    for file in files {
        validation::validate_attachment(&file.filename, file.data.len(), max_bytes)?;
    }
    Ok(())
}

/// Store uploaded files inside the caller's transaction.
pub(crate) async fn store_uploads(
    tx: &mut DbTx<'_>,
    issue_id: DbId,
    comment_id: Option<DbId>,
    files: &[NewAttachment],
) -> Result<Vec<Attachment>, sqlx::Error> {
    let mut stored = Vec::with_capacity(files.len());
    for file in files {
        let attachment = AttachmentRepo::create(
            tx,
            &CreateAttachment {
                issue_id,
                comment_id,
                filename: file.filename.trim(),
                mimetype: &file.mimetype,
                data: &file.data,
            },
        )
        .await?;
        stored.push(attachment);
    }
    Ok(stored)
}

impl IssueWorkflow {
    /// File a new issue. Only citizens may do this.
    ///
    /// The issue and its files are written in one transaction.
    pub async fn create_issue(&self, actor: &Actor, input: NewIssue) -> WorkflowResult<IssueDetail> {
        let citizen_id = access::authorize_create(actor)?;

        let description = validation::validate_description(&input.description)?;
        let title = validation::validate_title(input.title.as_deref())?;
        validate_uploads(&input.attachments, self.config.max_attachment_bytes)?;

        match CategoryRepo::find_by_id(&self.pool, input.category_id).await? {
            Some(category) if category.is_active => {}
            _ => {
                return Err(CoreError::validation(
                    "category_id",
                    format!("Category {} does not exist or is inactive", input.category_id),
                )
                .into())
            }
        }

        let mut tx = self.pool.begin().await?;
        let issue = IssueRepo::create(
            &mut tx,
            &CreateIssue {
                citizen_id,
                category_id: input.category_id,
                title,
                description,
                created_by: actor.user_id(),
            },
        )
        .await?;
        let attachments = store_uploads(&mut tx, issue.id, None, &input.attachments).await?;
        tx.commit().await?;

        tracing::info!(
            issue_id = issue.id,
            user_id = actor.user_id(),
            category_id = issue.category_id,
            attachments = attachments.len(),
            "Issue filed"
        );

        let summary = IssueRepo::find_summary(&self.pool, issue.id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY_ISSUE,
                id: issue.id,
            })?;
        Ok(IssueDetail {
            issue: summary,
            attachments,
        })
    }

    /// One page of the issues the caller may see, newest first.
    pub async fn list_issues(
        &self,
        actor: &Actor,
        status: Option<IssueStatus>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> WorkflowResult<Page<IssueSummary>> {
        let scope: ListScope = access::list_scope(actor, self.config.policy);
        let page = pagination::clamp_page(page);
        let limit = pagination::clamp_limit(limit, pagination::DEFAULT_LIMIT, pagination::MAX_LIMIT);
        let offset = pagination::offset_for(page, limit);

        let (items, total) = IssueRepo::list_scoped(&self.pool, &scope, status, limit, offset).await?;
        Ok(Page::new(items, page, limit, total))
    }

    /// Issue detail with the files filed alongside it.
    pub async fn get_issue(&self, actor: &Actor, issue_id: DbId) -> WorkflowResult<IssueDetail> {
        let issue = self.find_viewable(actor, issue_id).await?;
        let attachments = AttachmentRepo::list_for_issue(&self.pool, issue_id).await?;
        Ok(IssueDetail { issue, attachments })
    }

    /// Comments on an issue, oldest first, each with its files.
    pub async fn list_comments(
        &self,
        actor: &Actor,
        issue_id: DbId,
    ) -> WorkflowResult<Vec<CommentView>> {
        self.find_viewable(actor, issue_id).await?;

        let comments = CommentRepo::list_for_issue(&self.pool, issue_id).await?;
        let ids: Vec<DbId> = comments.iter().map(|c| c.id).collect();
        let files = AttachmentRepo::list_for_comments(&self.pool, &ids).await?;

        let mut by_comment: HashMap<DbId, Vec<Attachment>> = HashMap::new();
        for file in files {
            if let Some(comment_id) = file.comment_id {
                by_comment.entry(comment_id).or_default().push(file);
            }
        }

        Ok(comments
            .into_iter()
            .map(|comment| {
                let attachments = by_comment.remove(&comment.id).unwrap_or_default();
                CommentView {
                    comment,
                    attachments,
                }
            })
            .collect())
    }

    /// A stored file, readable by anyone who may view its issue.
    ///
    /// A caller who cannot see the parent issue gets the same `NotFound` as
    /// for a missing attachment, except officials outside the category, who
    /// get `Forbidden` as they do for the issue itself.
    pub async fn get_attachment(
        &self,
        actor: &Actor,
        attachment_id: DbId,
    ) -> WorkflowResult<AttachmentBlob> {
        let not_found = || CoreError::NotFound {
            entity: ENTITY_ATTACHMENT,
            id: attachment_id,
        };

        let blob = AttachmentRepo::find_blob(&self.pool, attachment_id)
            .await?
            .ok_or_else(not_found)?;
        let issue = IssueRepo::find_by_id(&self.pool, blob.issue_id)
            .await?
            .ok_or_else(not_found)?;

        match access::authorize_view(actor, &issue.subject()) {
            Ok(()) => Ok(blob),
            Err(CoreError::NotFound { .. }) => Err(not_found().into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Active categories for the filing form.
    pub async fn list_categories(&self) -> WorkflowResult<Vec<IssueCategory>> {
        Ok(CategoryRepo::list_active(&self.pool).await?)
    }

    /// Load an issue and check the caller may view it.
    async fn find_viewable(&self, actor: &Actor, issue_id: DbId) -> WorkflowResult<IssueSummary> {
        let issue = IssueRepo::find_summary(&self.pool, issue_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY_ISSUE,
                id: issue_id,
            })?;
        access::authorize_view(actor, &issue.subject())?;
        Ok(issue)
    }
}
