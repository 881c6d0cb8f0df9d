//! Multipart upload receiver.
//!
//! Streams the `file` part into the scratch directory chunk by chunk, enforcing the size
//! cap as bytes arrive, and hands the finished scratch file to the content service.

use crate::error::ApiError;
use axum::extract::Multipart;
use hub_core::IncomingFile;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// The two parts of an upload form once the body has been fully read.
#[derive(Default)]
pub struct UploadForm {
    pub path: Option<String>,
    pub file: Option<IncomingFile>,
}

impl UploadForm {
    fn discard(&self) {
        if let Some(file) = &self.file {
            file.discard();
        }
    }
}

/// Reads a multipart body with a `path` text part and a `file` part.
///
/// Unknown parts are ignored. A second `file` part replaces the first, whose scratch
/// file is removed. On any error every scratch file written so far is removed.
pub async fn receive(
    mut multipart: Multipart,
    scratch_dir: &Path,
    limit: u64,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    match read_parts(&mut multipart, scratch_dir, limit, &mut form).await {
        Ok(()) => Ok(form),
        Err(e) => {
            form.discard();
            Err(e)
        }
    }
}

async fn read_parts(
    multipart: &mut Multipart,
    scratch_dir: &Path,
    limit: u64,
    form: &mut UploadForm,
) -> Result<(), ApiError> {
    while let Some(mut field) = multipart.next_field().await? {
        let part = field.name().map(str::to_owned);
        match part.as_deref() {
            Some("path") => form.path = Some(field.text().await?),
            Some("file") => {
                let original_name = field.file_name().unwrap_or_default().to_owned();
                let mime_hint = field.content_type().map(str::to_owned);
                let temp_location =
                    scratch_dir.join(hub_files::scratch_file_name(&original_name));

                let byte_size = stream_to(&mut field, &temp_location, limit).await?;
                form.discard();
                form.file = Some(IncomingFile {
                    original_name,
                    mime_hint,
                    temp_location,
                    byte_size,
                });
            }
            _ => {}
        }
    }
    Ok(())
}

async fn stream_to(
    field: &mut axum::extract::multipart::Field<'_>,
    dest: &Path,
    limit: u64,
) -> Result<u64, ApiError> {
    let result = write_chunks(field, dest, limit).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(dest).await;
    }
    result
}

async fn write_chunks(
    field: &mut axum::extract::multipart::Field<'_>,
    dest: &Path,
    limit: u64,
) -> Result<u64, ApiError> {
    let io = |source: std::io::Error| ApiError::Io {
        action: "Save failed",
        source,
    };
    let mut out = tokio::fs::File::create(dest).await.map_err(io)?;
    let mut written: u64 = 0;

    while let Some(chunk) = field.chunk().await? {
        written += chunk.len() as u64;
        if written > limit {
            return Err(ApiError::PayloadTooLarge { limit });
        }
        out.write_all(&chunk).await.map_err(io)?;
    }
    out.flush().await.map_err(io)?;
    Ok(written)
}
