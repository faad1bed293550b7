//! # Model Creation Service
//!
//! Handles `POST /models`, a multipart form carrying:
//! - `name`: free-form model name (optional, stored as `null` when absent),
//! - `type`: free-form category label (optional, same rule),
//! - `file`: the model file itself (required).
//!
//! The file is streamed into the upload directory first and the record is
//! inserted afterwards. If the insert fails the file stays on disk with no
//! record pointing at it.

use crate::error::{ServiceError, NO_FILE_UPLOADED};
use crate::state::AppState;
use crate::store::ModelId;
use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{web, HttpResponse};
use common::responses::MessageResponse;
use futures_util::StreamExt;
use log::{info, warn};
use std::path::PathBuf;

/// Actix handler for `POST /models`.
///
/// # Returns
/// - `201 Created` with `{"message": "Model created successfully.", "id": ...}`.
/// - `400 Bad Request` with `{"error": "No file uploaded."}` when the form has
///   no usable `file` part.
pub async fn process(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    let id = create_model(&state, payload).await?;
    Ok(HttpResponse::Created().json(MessageResponse::with_id(
        "Model created successfully.",
        id.to_string(),
    )))
}

/// Reads the form, saves the file part and inserts the record.
pub async fn create_model(
    state: &AppState,
    mut payload: Multipart,
) -> Result<ModelId, ServiceError> {
    let mut name: Option<String> = None;
    let mut model_type: Option<String> = None;
    let mut file_path: Option<PathBuf> = None;
    let mut parts_read = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            // A body that is not multipart at all carries no file.
            Err(e) if parts_read == 0 => {
                warn!("Rejecting upload without a readable form: {}", e);
                return Err(ServiceError::validation(NO_FILE_UPLOADED));
            }
            Err(e) => {
                warn!("Rejecting upload broken after {} part(s): {}", parts_read, e);
                return Err(e.into());
            }
        };
        parts_read += 1;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match field_name.as_deref() {
            Some("file") if file_path.is_none() => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                // A file input left empty still sends a part, just without a name.
                if filename.is_empty() {
                    continue;
                }

                let chunks = field.map(|chunk| chunk.map_err(ServiceError::from));
                file_path = Some(state.files.save(&filename, chunks).await?);
            }
            Some("name") if name.is_none() => name = Some(read_text(&mut field).await?),
            Some("type") if model_type.is_none() => {
                model_type = Some(read_text(&mut field).await?)
            }
            _ => {}
        }
    }

    let Some(file_path) = file_path else {
        warn!("Rejecting model upload: no file part");
        return Err(ServiceError::validation(NO_FILE_UPLOADED));
    };

    let stored_path = file_path.to_string_lossy().into_owned();
    let records = state.records.clone();
    let id = web::block(move || records.insert(name, model_type, stored_path)).await??;

    info!("Model {} created with file {}", id, file_path.display());
    Ok(id)
}

async fn read_text(field: &mut Field) -> Result<String, MultipartError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
