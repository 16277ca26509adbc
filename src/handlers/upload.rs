use askama::Template;
use axum::extract::{Multipart, State};
use axum::response::Html;
use utoipa::ToSchema;

use crate::AppState;
use crate::error::AppError;
use crate::handlers::pages::ResultPage;
use crate::services::classifier::ClassifyError;
use crate::services::extractor::extract_text_from_pdf;
use crate::utils::validation::{allowed_file, sanitize_filename};

/// Multipart form payload: the résumé goes in the `file` field
#[derive(ToSchema)]
pub struct UploadForm {
    /// PDF file content
    #[schema(value_type = String, format = Binary)]
    pub file: String,
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Classification result page"),
        (status = 400, description = "Missing, unnamed, or non-PDF upload"),
        (status = 413, description = "Upload exceeds the size limit"),
        (status = 422, description = "PDF could not be read or contains no text"),
        (status = 500, description = "Storage or classification failure")
    ),
    tag = "upload"
)]
pub async fn upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        // 1. Validate before touching the body
        let original_filename = field.file_name().unwrap_or_default().to_string();
        if original_filename.is_empty() {
            return Err(AppError::EmptyFilename);
        }
        if !allowed_file(&original_filename) {
            return Err(AppError::InvalidFileFormat);
        }

        let data = field.bytes().await?;
        if data.len() > state.config.max_file_size {
            return Err(AppError::PayloadTooLarge(state.config.max_file_size_mb()));
        }

        // 2. Persist under the sanitized name
        let filename = sanitize_filename(&original_filename);
        let path = state.store.save(&filename, &data).await?;
        tracing::info!("Stored upload {} ({} bytes)", filename, data.len());

        // 3. Extract and classify
        let text = extract_text_from_pdf(&path)?;
        let classification = state.classifier.classify(&text).await?;
        let top = classification.top().ok_or_else(|| {
            AppError::Classification(ClassifyError::Inference("empty ranking".to_string()))
        })?;

        tracing::info!(
            "Classified {} as {} (score {:.3})",
            filename,
            top.role,
            top.score
        );

        let page = ResultPage {
            filename,
            predicted_role: top.role.clone(),
            confidence: top.score,
        };
        return Ok(Html(page.render()?));
    }

    Err(AppError::MissingFilePart)
}
