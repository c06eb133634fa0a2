//! File access boundary interface.
//!
//! Actual filesystem I/O is explicitly out-of-core (spec §1): this crate
//! only declares the seam a concrete implementation plugs into. Tests use
//! an in-memory [`FileReader`] implementation; a real deployment backs
//! this with an actual filesystem reader in an outer crate.

use aiorc_error::{DispatchError, ErrorKind};

/// Metadata about a file, used for PLANNING-phase reference-only
/// embedding (spec §4.6: "path + size + language hint, never bodies").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Byte length of the file.
    pub size_bytes: u64,
    /// Best-effort language hint derived from the file extension.
    pub language_hint: Option<String>,
}

/// The boundary a Workflow tool uses to resolve file paths named in an
/// envelope into metadata or full bodies, without this crate taking a
/// dependency on any particular filesystem API.
pub trait FileReader: Send + Sync {
    /// Read a file's full body.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ValidationError`] if the path cannot be read
    /// (missing, unreadable, or not a regular file).
    fn read(&self, path: &str) -> Result<String, DispatchError>;

    /// Look up a file's metadata without reading its body, for
    /// reference-only (PLANNING phase) embedding.
    ///
    /// # Errors
    ///
    /// As [`Self::read`].
    fn metadata(&self, path: &str) -> Result<FileMetadata, DispatchError>;
}

/// Derive a language hint from a path's extension, shared by every
/// [`FileReader`] implementation so the hint logic lives in one place.
#[must_use]
pub fn language_hint_for(path: &str) -> Option<String> {
    std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_string)
}

fn not_found(path: &str) -> DispatchError {
    DispatchError::new(ErrorKind::ValidationError, format!("cannot read file '{path}'"))
}

/// A deterministic, in-memory [`FileReader`] for tests: files are
/// pre-seeded by path, no filesystem is touched.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileReader {
    files: std::collections::HashMap<String, String>,
}

impl InMemoryFileReader {
    /// Construct an empty in-memory file set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `path` with `content`.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl FileReader for InMemoryFileReader {
    fn read(&self, path: &str) -> Result<String, DispatchError> {
        self.files.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn metadata(&self, path: &str) -> Result<FileMetadata, DispatchError> {
        let content = self.files.get(path).ok_or_else(|| not_found(path))?;
        Ok(FileMetadata {
            size_bytes: content.len() as u64,
            language_hint: language_hint_for(path),
        })
    }
}
