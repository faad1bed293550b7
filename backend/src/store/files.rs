//! # File Store
//!
//! Uploaded bytes live in one flat directory, each file named after the
//! filename the client sent. A second upload with the same name replaces the
//! first; nothing locks or versions the files.

use actix_files::NamedFile;
use actix_web::http::header::DispositionType;
use futures_util::{Stream, StreamExt};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub type FileStoreResult<T> = Result<T, FileStoreError>;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid upload filename {0:?}")]
    InvalidFilename(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileStoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates the upload directory if it is missing and resolves it to an
    /// absolute path.
    pub fn init(dir: impl AsRef<Path>) -> FileStoreResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| FileStoreError::io(dir, e))?;
        let root = std::fs::canonicalize(dir).map_err(|e| FileStoreError::io(dir, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where an upload called `filename` ends up. Only the last path
    /// component of the client's name is used.
    pub fn path_for(&self, filename: &str) -> FileStoreResult<PathBuf> {
        Path::new(filename)
            .file_name()
            .map(|name| self.root.join(name))
            .ok_or_else(|| FileStoreError::InvalidFilename(filename.to_string()))
    }

    /// Opens `<root>/<filename>` for writing, truncating any existing file.
    pub async fn create(&self, filename: &str) -> FileStoreResult<UploadWriter> {
        let path = self.path_for(filename)?;
        let file = File::create(&path)
            .await
            .map_err(|e| FileStoreError::io(&path, e))?;
        Ok(UploadWriter { path, file })
    }

    /// Writes every chunk of `chunks` to `<root>/<filename>` and returns the
    /// absolute path. The first error from the stream aborts the write and
    /// leaves whatever was written so far on disk.
    pub async fn save<S, B, E>(&self, filename: &str, mut chunks: S) -> Result<PathBuf, E>
    where
        S: Stream<Item = Result<B, E>> + Unpin,
        B: AsRef<[u8]>,
        E: From<FileStoreError>,
    {
        let mut writer = self.create(filename).await?;
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(bytes) => writer.write_chunk(bytes.as_ref()).await?,
                Err(e) => {
                    writer.finish().await?;
                    return Err(e);
                }
            }
        }
        Ok(writer.finish().await?)
    }

    /// Opens a stored file as an attachment download named after its last
    /// path component.
    pub async fn read(&self, path: &Path) -> FileStoreResult<NamedFile> {
        let file = match NamedFile::open_async(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FileStoreError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(FileStoreError::io(path, e)),
        };

        // NamedFile already encodes non-ASCII names as `filename*`.
        let mut disposition = file.content_disposition().clone();
        disposition.disposition = DispositionType::Attachment;
        Ok(file.set_content_disposition(disposition))
    }
}

/// An upload being streamed to disk.
pub struct UploadWriter {
    path: PathBuf,
    file: File,
}

impl UploadWriter {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> FileStoreResult<()> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| FileStoreError::io(&self.path, e))
    }

    /// Flushes the file and returns its absolute path.
    pub async fn finish(mut self) -> FileStoreResult<PathBuf> {
        self.file
            .flush()
            .await
            .map_err(|e| FileStoreError::io(&self.path, e))?;
        Ok(self.path)
    }
}
