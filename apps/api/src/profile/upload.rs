//! CV upload: PDF bytes → text (pdf-extract) and S3 object.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
/// Uploads larger than this are rejected before parsing.
pub const MAX_CV_BYTES: usize = 10 * 1024 * 1024;

pub fn cv_object_key(user_id: Uuid) -> String {
    format!("cvs/{}/{}.pdf", user_id, Uuid::new_v4())
}

/// Accepts by declared content type, or by extension when the browser sends none.
pub fn is_pdf(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    match content_type {
        Some(ct) if ct != "application/octet-stream" => ct == PDF_CONTENT_TYPE,
        _ => file_name.is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf")),
    }
}

/// Extracts plain text. Parsing is CPU-bound, so it runs on the blocking pool.
pub async fn extract_pdf_text(data: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::Validation("Could not read the PDF".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
            }
        })?
        .map_err(|e| AppError::Validation(format!("Could not read the PDF: {e}")))?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the PDF. Is it a scanned image?".to_string(),
        ));
    }
    Ok(text)
}

/// Stores the original file and returns its object key.
pub async fn store_cv(
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    user_id: Uuid,
    data: Bytes,
) -> Result<String, AppError> {
    let key = cv_object_key(user_id);
    s3.put_object()
        .bucket(s3_bucket)
        .key(&key)
        .body(ByteStream::from(data))
        .content_type(PDF_CONTENT_TYPE)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("CV upload failed: {e}")))?;

    info!("Uploaded CV to s3://{}/{}", s3_bucket, key);
    Ok(key)
}

/// Best effort: failures are logged, not returned.
pub async fn delete_cv(s3: &aws_sdk_s3::Client, s3_bucket: &str, key: &str) {
    match s3.delete_object().bucket(s3_bucket).key(key).send().await {
        Ok(_) => info!("Deleted CV s3://{}/{}", s3_bucket, key),
        Err(e) => warn!("Could not delete CV s3://{}/{}: {e}", s3_bucket, key),
    }
}
