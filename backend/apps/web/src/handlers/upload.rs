//! Upload Handler
//!
//! The CSRF-exempt multipart endpoint. Accepts the upload and reports
//! file metadata; durable blob storage is out of scope.

use axum::Json;
use axum::extract::Multipart;
use serde::Serialize;

use kernel::error::app_error::{AppError, AppResult};

/// Metadata for one received file part
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub size_bytes: usize,
}

/// Upload response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub files: Vec<UploadedFile>,
}

/// POST /api/upload
pub async fn upload(mut multipart: Multipart) -> AppResult<Json<UploadResponse>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or("file").to_string();
        let file_name = field.file_name().map(|name| name.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {e}")))?;

        tracing::info!(
            field = %field_name,
            size_bytes = data.len(),
            "Received upload part"
        );

        files.push(UploadedFile {
            field: field_name,
            file_name,
            size_bytes: data.len(),
        });
    }

    if files.is_empty() {
        return Err(AppError::bad_request("No file parts in upload"));
    }

    Ok(Json(UploadResponse { files }))
}
