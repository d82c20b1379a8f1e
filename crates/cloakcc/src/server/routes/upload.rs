//! Compile request handler
//!
//! Validates the uploaded source and transform option in a fixed order,
//! drives one compiler invocation, and returns the artifact as a binary
//! attachment. Validation failures happen before any file is written, so
//! they leave the working directory untouched; the compiler driver owns
//! cleanup for everything after that.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use uuid::Uuid;

use crate::compiler::{TransformOption, ALLOWED_EXTENSIONS};
use crate::error::{Error, Result};
use crate::sanitize;
use crate::server::state::AppState;

/// POST /upload - Compile an uploaded source file
pub async fn compile_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut option_raw: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_err)? {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(map_multipart_err)?;
                upload = Some((filename, data));
            }
            "option" => {
                option_raw = Some(field.text().await.map_err(map_multipart_err)?);
            }
            // Unknown fields are drained and ignored
            _ => {
                field.bytes().await.map_err(map_multipart_err)?;
            }
        }
    }

    let (claimed_name, source) = upload.ok_or(Error::MissingFile)?;

    if claimed_name.is_empty() {
        return Err(Error::EmptyFilename);
    }

    let ext = sanitize::extension(&claimed_name)
        .map(|e| e.to_lowercase())
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .ok_or(Error::InvalidFileType)?;

    // The option is checked before anything touches the filesystem. A
    // missing field falls through as the sentinel "none", which is not in
    // the allowed set.
    let option = TransformOption::parse(option_raw.as_deref().unwrap_or("none"))
        .ok_or(Error::InvalidOption)?;

    let filename = {
        let sanitized = sanitize::sanitize_filename(&claimed_name);
        if sanitized.is_empty() {
            format!("file_{}.{}", Uuid::new_v4(), ext)
        } else {
            sanitized
        }
    };

    tracing::info!(
        "Compile request: {} ({} bytes) with -{}",
        filename,
        source.len(),
        option.flag()
    );

    let artifact = state.compiler().compile(&filename, &source, option).await?;

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        ),
    ];

    Ok((StatusCode::OK, headers, artifact.bytes).into_response())
}

/// Keep the transport-level size cap distinguishable from other multipart
/// decoding failures.
fn map_multipart_err(err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge
    } else {
        Error::Multipart(err)
    }
}
