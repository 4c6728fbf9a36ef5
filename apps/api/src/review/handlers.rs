//! Axum route handler for the review API.

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use bytes::{Bytes, BytesMut};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::MAX_UPLOAD_BYTES;
use crate::errors::AppError;
use crate::models::analysis::CVAnalysis;
use crate::pipeline::runner::{run_review, ReviewInput};
use crate::review::staging::StagedUpload;
use crate::review::validation::{authorize, prompt_display_name, require_pdf, staged_file_name};
use crate::state::AppState;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const RESUME_FILE_FIELD: &str = "resume_file";
const RESUME_FILENAME_FIELD: &str = "resume_filename";

/// The resume part of the form, fully buffered.
#[derive(Debug)]
pub struct UploadedResume {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A validated review request.
#[derive(Debug)]
pub struct ReviewForm {
    pub job_description: String,
    pub resume: UploadedResume,
}

/// POST /api/v1/review
///
/// Multipart fields: `job_description` (text), `resume_file` (PDF, ≤ 2 MB),
/// optional `resume_filename`. Header: `x-api-key`.
/// Returns the ATS report produced by the scoring stage.
pub async fn handle_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CVAnalysis>, AppError> {
    // Authenticate before reading a single byte of the upload.
    authorize(&headers, state.config.api_key.as_deref())?;

    let mut multipart =
        multipart.map_err(|e| AppError::UnprocessableEntity(e.body_text()))?;
    let form = read_review_form(&mut multipart).await?;

    let request_id = Uuid::new_v4();
    let file_name = staged_file_name(&form.resume.file_name);
    let display_name = prompt_display_name(&form.resume.file_name);
    let staged = StagedUpload::stage(
        &state.config.upload_dir,
        &state.config.knowledge_dir,
        &file_name,
        &form.resume.bytes,
    )
    .await?;

    info!(
        "Review {request_id}: staged '{}' as {} ({} bytes)",
        form.resume.file_name,
        staged.upload_path().display(),
        form.resume.bytes.len()
    );

    let result = run_review(
        state.runtime.as_ref(),
        ReviewInput {
            resume_path: staged.knowledge_path(),
            resume_name: &display_name,
            job_description: &form.job_description,
        },
    )
    .await;

    staged.remove().await;
    debug!("Review {request_id}: staged files removed");

    Ok(Json(result?))
}

/// Streams the multipart body into a `ReviewForm`.
///
/// Check order: size (while streaming) → content type → missing or empty input.
pub async fn read_review_form(multipart: &mut Multipart) -> Result<ReviewForm, AppError> {
    let mut job_description: Option<String> = None;
    let mut file_name_override: Option<String> = None;
    let mut resume: Option<UploadedResume> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some(JOB_DESCRIPTION_FIELD) => {
                job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            Some(RESUME_FILENAME_FIELD) => {
                file_name_override = Some(field.text().await.map_err(multipart_error)?);
            }
            Some(RESUME_FILE_FIELD) => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field.content_type().map(String::from);
                let bytes = read_limited(field, MAX_UPLOAD_BYTES).await?;
                resume = Some(UploadedResume {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {} // unknown fields are skipped by the next `next_field` call
        }
    }

    let mut resume = resume.ok_or_else(|| {
        AppError::UnprocessableEntity(format!("Missing '{RESUME_FILE_FIELD}' field"))
    })?;
    require_pdf(resume.content_type.as_deref())?;
    if resume.bytes.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Uploaded resume is empty".to_string(),
        ));
    }
    if let Some(name) = file_name_override.filter(|n| !n.trim().is_empty()) {
        resume.file_name = name.trim().to_string();
    }

    let job_description = job_description
        .map(|jd| jd.trim().to_string())
        .filter(|jd| !jd.is_empty())
        .ok_or_else(|| {
            AppError::UnprocessableEntity(format!("'{JOB_DESCRIPTION_FIELD}' cannot be empty"))
        })?;

    Ok(ReviewForm {
        job_description,
        resume,
    })
}

/// Buffers a field, failing as soon as it grows past `limit` bytes.
async fn read_limited(mut field: Field<'_>, limit: usize) -> Result<Bytes, AppError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if buffer.len() + chunk.len() > limit {
            return Err(too_large());
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::UnprocessableEntity(err.body_text())
    }
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge(format!(
        "Upload too large. Max {} MB allowed.",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    ))
}
