//! # Model Service Module
//!
//! Routes every request under `/models` to the handler that owns it. Each
//! sub-module exposes a `process` function used as the Actix handler and a
//! plain async function with the actual logic.
//!
//! ## Sub-modules:
//! - `list`: returns every stored record, without identifiers.
//! - `create`: stores an uploaded file and registers a record pointing at it.
//! - `update`: merges a JSON object into an existing record.
//! - `delete`: removes a record, leaving its file on disk.
//! - `download`: streams a record's file back as an attachment.

mod create;
mod delete;
mod download;
mod list;
mod update;

use crate::error::ServiceError;
use actix_web::web::{self, delete, get, post, put, scope};
use actix_web::Scope;

/// The base path for all model endpoints.
const API_PATH: &str = "/models";

/// Configures and returns the Actix `Scope` for the model routes.
///
/// # Registered Routes:
///
/// *   **`GET /models`** → `list::process`: JSON array of all records.
/// *   **`POST /models`** → `create::process`: multipart form with `name`,
///     `type` and `file`; `201` on success, `400` when no file was sent.
/// *   **`DELETE /models/{id}`** → `delete::process`: `200` or `404`.
/// *   **`PUT /models/{id}`** → `update::process`: JSON object merged into the
///     record; `200` or `404`.
/// *   **`GET /models/{id}/file`** → `download::process`: the stored file as an
///     attachment, or `404` when the record or its path is missing.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{id}", delete().to(delete::process))
        .route("/{id}", put().to(update::process))
        .route("/{id}/file", get().to(download::process))
}

/// JSON extractor settings for update bodies: size limit plus error bodies in
/// the same `{"error": ...}` shape as the rest of the API.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ServiceError::validation(err.to_string()).into())
}
