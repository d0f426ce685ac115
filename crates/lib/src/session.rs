//! # Session Storage and Packaging
//!
//! Every generation request gets a session: a directory that collects the
//! image files materialized during placeholder resolution. This module owns
//! that directory layout and turns a finished session into downloadable
//! artifacts, a zip archive of the document plus its images, or a docx
//! produced by an external converter.
//!
//! Sessions are keyed by server-generated UUIDs, but the download endpoints
//! echo ids back from clients, so every external id is checked against the
//! UUID alphabet before it touches a path.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

/// The markdown document name inside every zip archive.
const ARCHIVE_DOCUMENT_NAME: &str = "writeup.md";

/// Custom error types for session packaging.
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Session '{0}' was not found")]
    SessionNotFound(String),
    #[error("The document converter is not installed")]
    ConverterMissing,
    #[error("Document conversion failed: {0}")]
    ConverterFailed(String),
    #[error("Failed to build the zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Session file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Owns the session root directory and the converter binary name.
#[derive(Clone, Debug)]
pub struct SessionStore {
    root: PathBuf,
    converter: String,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>, converter: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            converter: converter.into(),
        }
    }

    /// Mints the id for a new session.
    pub fn new_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Creates the directory for a session and returns its path.
    pub fn ensure_session_dir(&self, session_id: &str) -> std::io::Result<PathBuf> {
        let dir = self.root.join(session_id);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Resolves an externally supplied session id to its directory.
    ///
    /// Ids outside the UUID alphabet report the same not-found condition as
    /// ids that never had a session, so path traversal attempts are
    /// indistinguishable from typos.
    fn existing_session_dir(&self, session_id: &str) -> Result<PathBuf, PackageError> {
        let well_formed = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !well_formed {
            return Err(PackageError::SessionNotFound(session_id.to_string()));
        }
        let dir = self.root.join(session_id);
        if !dir.is_dir() {
            return Err(PackageError::SessionNotFound(session_id.to_string()));
        }
        Ok(dir)
    }

    /// The artifacts a session can accumulate across downloads. These are
    /// skipped when zipping so a re-download never nests earlier artifacts.
    fn artifact_names(session_id: &str) -> [String; 3] {
        [
            format!("{session_id}.md"),
            format!("{session_id}.docx"),
            format!("{session_id}.zip"),
        ]
    }

    /// Packages the final markdown and every session image into a zip.
    ///
    /// The archive holds `writeup.md` at its root and the session files under
    /// a `{session_id}/` prefix, matching the relative image links the
    /// resolver wrote into the document. The archive is also persisted into
    /// the session directory as `{session_id}.zip` before being returned.
    pub fn package_zip(&self, session_id: &str, markdown: &str) -> Result<Vec<u8>, PackageError> {
        let dir = self.existing_session_dir(session_id)?;
        let artifacts = Self::artifact_names(session_id);

        let mut file_names: Vec<String> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.') && !artifacts.contains(name))
            .collect();
        file_names.sort();

        let mut buffer = Vec::new();
        {
            let mut archive = ZipWriter::new(std::io::Cursor::new(&mut buffer));
            let options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(0o644);

            archive.start_file(ARCHIVE_DOCUMENT_NAME, options)?;
            archive.write_all(markdown.as_bytes())?;

            for name in &file_names {
                archive.start_file(format!("{session_id}/{name}"), options)?;
                archive.write_all(&fs::read(dir.join(name))?)?;
            }
            archive.finish()?;
        }

        persist_artifact(&dir, &format!("{session_id}.zip"), &buffer)?;
        info!(
            session_id,
            files = file_names.len(),
            bytes = buffer.len(),
            "Packaged session archive"
        );
        Ok(buffer)
    }

    /// Converts the final markdown into a docx with the external converter.
    ///
    /// The markdown is staged as `{session_id}.md` inside the session
    /// directory so relative image links resolve during conversion, and the
    /// staging file is removed afterwards. A missing converter binary is
    /// reported distinctly from a conversion failure.
    pub async fn package_docx(
        &self,
        session_id: &str,
        markdown: &str,
    ) -> Result<Vec<u8>, PackageError> {
        let dir = self.existing_session_dir(session_id)?;
        let markdown_path = dir.join(format!("{session_id}.md"));
        let docx_path = dir.join(format!("{session_id}.docx"));

        fs::write(&markdown_path, markdown)?;

        let result = Command::new(&self.converter)
            .arg(&markdown_path)
            .arg("-o")
            .arg(&docx_path)
            .output()
            .await;
        // The converter has exited either way; the staging file is done.
        remove_staging_file(&markdown_path);

        let output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(converter = %self.converter, "Document converter binary was not found");
                return Err(PackageError::ConverterMissing);
            }
            Err(e) => return Err(PackageError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(PackageError::ConverterFailed(stderr));
        }

        let bytes = fs::read(&docx_path)?;
        info!(session_id, bytes = bytes.len(), "Converted session document to docx");
        Ok(bytes)
    }

    /// Deletes every session directory older than `max_age` and returns how
    /// many were removed. A missing root counts as nothing to purge.
    pub fn purge_expired(&self, max_age: Duration) -> std::io::Result<usize> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        for entry in entries.filter_map(|entry| entry.ok()) {
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let age = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| modified.elapsed().ok());
            if let Some(age) = age {
                if age > max_age {
                    debug!(session = %entry.file_name().to_string_lossy(), "Purging expired session");
                    fs::remove_dir_all(entry.path())?;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}

/// Persists an artifact atomically so a concurrent download never reads a
/// half-written file. The staging name is unique per write, so concurrent
/// writers of the same artifact never share a staging file; the final
/// rename decides which copy survives.
fn persist_artifact(dir: &Path, name: &str, bytes: &[u8]) -> std::io::Result<()> {
    let staging = dir.join(format!(".{name}.{}.tmp", Uuid::new_v4()));
    fs::write(&staging, bytes)?;
    fs::rename(&staging, dir.join(name))
}

fn remove_staging_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "Failed to remove conversion staging file");
    }
}
