//! Shared application state injected into every handler as `web::Data`.

use crate::store::{FileStore, RecordStore};

/// Both stores are cheap to clone; each actix worker gets its own copy of the
/// handles pointing at the same database connection and upload directory.
#[derive(Clone)]
pub struct AppState {
    pub records: RecordStore,
    pub files: FileStore,
}

impl AppState {
    pub fn new(records: RecordStore, files: FileStore) -> Self {
        Self { records, files }
    }
}
