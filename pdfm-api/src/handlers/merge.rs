use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use oxidize_pdf::operations::MergeOptions;
use pdfm_core::services::Allowance;
use serde::{Deserialize, Serialize};

/// Optional `options` field of a merge upload
#[derive(Debug, Default, Deserialize)]
pub struct MergePdfRequest {
    /// Keep bookmarks of the inputs
    pub preserve_bookmarks: Option<bool>,
    /// Whether to optimize the output
    pub optimize: Option<bool>,
}

/// Summary sent in the `X-Merge-Info` header
#[derive(Debug, Serialize, Deserialize)]
pub struct MergePdfResponse {
    /// Success message
    pub message: String,
    /// Number of PDFs merged
    pub files_merged: usize,
    /// Pages across all inputs
    pub total_pages: u32,
    /// Output file size in bytes
    pub output_size: usize,
    /// Merges left in the current window; absent for unlimited accounts
    pub remaining_merges: Option<u32>,
}

/// Merge the uploaded `files` for the calling user, subject to the merge quota
pub async fn merge_pdfs_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut pdf_files = Vec::new();
    let mut merge_options = MergeOptions::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "files" || field_name == "files[]" {
            let file_data = field.bytes().await?;
            pdf_files.push(file_data.to_vec());
        } else if field_name == "options" {
            let options_text = field.text().await?;
            let request: MergePdfRequest = serde_json::from_str(&options_text)
                .map_err(|e| AppError::BadRequest(format!("Invalid merge options: {e}")))?;
            if let Some(preserve_bookmarks) = request.preserve_bookmarks {
                merge_options.preserve_bookmarks = preserve_bookmarks;
            }
            if let Some(optimize) = request.optimize {
                merge_options.optimize = optimize;
            }
        }
    }

    let merged = state.merge.merge_for(&user, pdf_files, merge_options).await?;

    let info = MergePdfResponse {
        message: "PDFs merged successfully".to_string(),
        files_merged: merged.files_merged,
        total_pages: merged.total_pages,
        output_size: merged.bytes.len(),
        remaining_merges: match merged.allowance {
            Allowance::Unlimited => None,
            Allowance::Remaining(left) => Some(left),
        },
    };
    let info = serde_json::to_string(&info)
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"merged.pdf\"".to_string(),
            ),
            (HeaderName::from_static("x-merge-info"), info),
        ],
        merged.bytes,
    )
        .into_response())
}
