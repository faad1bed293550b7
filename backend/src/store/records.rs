//! # Record Store
//!
//! A document collection of model metadata kept in an embedded SQLite file.
//! Each row holds the generated identifier and the JSON document of the
//! record; the identifier is never part of the document itself, so listings
//! come out without it.
//!
//! All methods are blocking. Handlers run them through `web::block` so the
//! actix workers are not held up by SQLite I/O.

use common::model::ml_model::ModelDocument;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

/// A stored record as a free-form JSON object.
pub type Document = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields the merge in [`RecordStore::update`] never touches.
const IMMUTABLE_FIELDS: &[&str] = &["id", "date_added"];

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS models (
    id       TEXT PRIMARY KEY,
    document TEXT NOT NULL
)";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("model {0} not found")]
    NotFound(ModelId),

    #[error("invalid model id {0:?}: {1}")]
    InvalidId(String, #[source] uuid::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("malformed document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("record store is closed")]
    Closed,

    #[error("record store lock poisoned")]
    Poisoned,
}

/// Identifier assigned to a record at insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(Uuid);

impl ModelId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Decodes a client-supplied identifier. Anything `uuid` cannot parse is
    /// an [`StoreError::InvalidId`], never a "not found".
    pub fn parse(raw: &str) -> StoreResult<Self> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|e| StoreError::InvalidId(raw.to_string(), e))
    }
}

impl FromStr for ModelId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Handle to the model collection. Cloning shares the same connection.
#[derive(Clone)]
pub struct RecordStore {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl RecordStore {
    /// Opens (or creates) the SQLite file at `path` and ensures the schema.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::init(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let guard = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        f(conn)
    }

    /// Every stored document in insertion order. An empty collection yields
    /// an empty vector.
    pub fn list(&self) -> StoreResult<Vec<Document>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT document FROM models ORDER BY rowid")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

            let mut documents = Vec::new();
            for raw in rows {
                documents.push(serde_json::from_str(&raw?)?);
            }
            Ok(documents)
        })
    }

    /// Stores a new record stamped with the current time and returns its id.
    pub fn insert(
        &self,
        name: Option<String>,
        model_type: Option<String>,
        file_path: String,
    ) -> StoreResult<ModelId> {
        let document = ModelDocument::new(name, model_type, file_path);
        let json = serde_json::to_string(&document)?;
        let id = ModelId::generate();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO models (id, document) VALUES (?1, ?2)",
                params![id.to_string(), json],
            )?;
            Ok(id)
        })
    }

    /// Merges `fields` into the record. The call fails with
    /// [`StoreError::NotFound`] when the record is missing or when the merge
    /// leaves the document unchanged.
    pub fn update(&self, id: &ModelId, fields: Document) -> StoreResult<()> {
        self.with_conn(|conn| {
            let current: Option<String> = conn
                .query_row(
                    "SELECT document FROM models WHERE id = ?1",
                    params![id.to_string()],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(raw) = current else {
                return Err(StoreError::NotFound(*id));
            };

            let mut document: Document = serde_json::from_str(&raw)?;
            let mut modified = false;
            for (key, value) in fields {
                if IMMUTABLE_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                if document.get(&key) != Some(&value) {
                    document.insert(key, value);
                    modified = true;
                }
            }
            if !modified {
                return Err(StoreError::NotFound(*id));
            }

            conn.execute(
                "UPDATE models SET document = ?1 WHERE id = ?2",
                params![serde_json::to_string(&document)?, id.to_string()],
            )?;
            Ok(())
        })
    }

    pub fn delete(&self, id: &ModelId) -> StoreResult<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM models WHERE id = ?1", params![id.to_string()])?;
            if deleted == 0 {
                return Err(StoreError::NotFound(*id));
            }
            Ok(())
        })
    }

    pub fn get_by_id(&self, id: &ModelId) -> StoreResult<Option<Document>> {
        self.with_conn(|conn| {
            let raw: Option<String> = conn
                .query_row(
                    "SELECT document FROM models WHERE id = ?1",
                    params![id.to_string()],
                    |row| row.get(0),
                )
                .optional()?;
            raw.map(|raw| serde_json::from_str(&raw))
                .transpose()
                .map_err(StoreError::from)
        })
    }

    /// Closes the underlying connection. Later calls fail with
    /// [`StoreError::Closed`]; closing twice is a no-op.
    pub fn close(&self) -> StoreResult<()> {
        let mut guard = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| StoreError::Database(e))?;
        }
        Ok(())
    }
}
