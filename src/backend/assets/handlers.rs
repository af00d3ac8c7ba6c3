/**
 * Asset Handlers
 *
 * - `POST /upload-photo` - multipart field `file`
 * - `POST /stampbook/generate-stamp-image` - multipart field `reference_image`
 *
 * Both respond with the public URL of the stored object.
 */

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::pipeline::AssetPipeline;
use crate::backend::error::BackendError;

/// Request body cap for the multipart endpoints
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadPhotoResponse {
    pub message: String,
    pub download_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StampImageResponse {
    pub stamp_url: String,
}

/// A file part read out of a multipart body
#[derive(Debug)]
struct FilePart {
    file_name: Option<String>,
    content_type: String,
    bytes: Bytes,
}

async fn read_part(field: Field<'_>) -> Result<FilePart, BackendError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| BackendError::handler(StatusCode::BAD_REQUEST, format!("Failed to read upload: {e}")))?;
    Ok(FilePart {
        file_name,
        content_type,
        bytes,
    })
}

/// Find the named file field, skipping any others
async fn file_field(multipart: &mut Multipart, name: &'static str) -> Result<FilePart, BackendError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BackendError::handler(StatusCode::BAD_REQUEST, format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some(name) {
            return read_part(field).await;
        }
    }
    Err(BackendError::validation(name, "missing file field"))
}

/// Upload photo handler
///
/// # Example Response
///
/// ```json
/// {
///   "message": "Photo uploaded successfully",
///   "download_url": "http://127.0.0.1:3000/media/photos/3f2b...-beach.jpg"
/// }
/// ```
pub async fn upload_photo(
    State(assets): State<AssetPipeline>,
    mut multipart: Multipart,
) -> Result<Json<UploadPhotoResponse>, BackendError> {
    let part = file_field(&mut multipart, "file").await?;
    tracing::info!(
        "Photo upload: {:?} ({}, {} bytes)",
        part.file_name,
        part.content_type,
        part.bytes.len()
    );

    let stored = assets
        .upload_photo(part.file_name.as_deref(), part.bytes, &part.content_type)
        .await?;

    Ok(Json(UploadPhotoResponse {
        message: "Photo uploaded successfully".to_string(),
        download_url: stored.url,
    }))
}

/// Generate stamp image handler
pub async fn generate_stamp_image(
    State(assets): State<AssetPipeline>,
    mut multipart: Multipart,
) -> Result<Json<StampImageResponse>, BackendError> {
    let part = file_field(&mut multipart, "reference_image").await?;
    tracing::info!("Stamp image requested from {} byte reference", part.bytes.len());

    let stored = assets.generate_stamp_image(&part.bytes, &part.content_type).await?;

    Ok(Json(StampImageResponse { stamp_url: stored.url }))
}
