//! Multipart form reading shared by the issue and comment endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;
use civic_core::error::CoreError;
use civic_core::validation::MAX_ATTACHMENTS_PER_REQUEST;
use civic_workflow::NewAttachment;

use crate::error::{AppError, AppResult};

/// Used when a file part does not declare a content type.
const DEFAULT_MIMETYPE: &str = "application/octet-stream";

/// Text fields and uploaded files of one multipart request.
///
/// Any part that carries a filename is a file; every other part is a text
/// field. Repeated text fields keep the last value.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    pub files: Vec<NewAttachment>,
}

impl MultipartForm {
    /// Drain a multipart body.
    ///
    /// Stops with a validation error as soon as more files arrive than one
    /// request may carry, before reading the rest of the body.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(filename) = field.file_name().map(str::to_string) {
                if form.files.len() == MAX_ATTACHMENTS_PER_REQUEST {
                    return Err(CoreError::validation(
                        "attachments",
                        format!("At most {MAX_ATTACHMENTS_PER_REQUEST} files per request"),
                    )
                    .into());
                }
                let mimetype = field
                    .content_type()
                    .unwrap_or(DEFAULT_MIMETYPE)
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.files.push(NewAttachment {
                    filename,
                    mimetype,
                    data: data.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A text field, `None` when absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A text field that must be present and non-blank.
    pub fn required(&self, name: &'static str) -> Result<&str, CoreError> {
        match self.text(name).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(CoreError::validation(name, format!("'{name}' is required"))),
        }
    }

    /// A required integer id field.
    pub fn required_id(&self, name: &'static str) -> Result<i64, CoreError> {
        self.required(name)?
            .parse()
            .map_err(|_| CoreError::validation(name, format!("'{name}' must be an integer id")))
    }
}
