use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The document written to the record store when a model is registered.
///
/// `name` and `type` come straight from the upload form and are stored as
/// `null` when the client leaves them out. The identifier is not part of the
/// document; the store keeps it alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub model_type: Option<String>,
    /// Set by the server when the record is inserted.
    pub date_added: DateTime<Utc>,
    /// Absolute path of the uploaded file inside the upload directory.
    pub file_path: String,
}

impl ModelDocument {
    pub fn new(name: Option<String>, model_type: Option<String>, file_path: String) -> Self {
        Self {
            name,
            model_type,
            date_added: Utc::now(),
            file_path,
        }
    }
}
