//! Value objects for runbook documents.
//!
//! Every factory validates and normalizes its input; once constructed a
//! value is immutable and compares structurally.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_FILE_PATH_LEN: usize = 1024;
pub const MAX_COMMIT_HASH_LEN: usize = 64;
pub const MAX_CONTENT_BYTES: usize = 1024 * 1024;

/// Trims `raw` and checks it is non-empty and within `max` characters.
pub(crate) fn bounded_text(
    field: &str,
    raw: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(ValidationError::too_long(field, max, len));
    }
    Ok(trimmed.to_string())
}

// ════════════════════════════════════════════════════════════════════════════════
// VersionNumber - Monotonic positive version counter
// ════════════════════════════════════════════════════════════════════════════════

/// Position of a version within its document's history.
///
/// Strictly positive. The first version of every document is 1 and each
/// publish takes `max(existing) + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct VersionNumber(u32);

impl VersionNumber {
    /// Creates a version number, rejecting zero and negatives.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 || value > i64::from(u32::MAX) {
            return Err(ValidationError::out_of_range(
                "version_number",
                1,
                i64::from(u32::MAX),
                value,
            ));
        }
        Ok(Self(value as u32))
    }

    /// The number of the first version of every document.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the following version number.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the preceding version number; fails for version 1.
    pub fn previous(&self) -> Result<Self, ValidationError> {
        if self.0 < 2 {
            return Err(ValidationError::out_of_range(
                "version_number",
                2,
                i64::from(u32::MAX),
                i64::from(self.0),
            ));
        }
        Ok(Self(self.0 - 1))
    }

    /// Returns the raw number.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for VersionNumber {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VersionNumber> for i64 {
    fn from(number: VersionNumber) -> Self {
        i64::from(number.0)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Revision - Optimistic concurrency token
// ════════════════════════════════════════════════════════════════════════════════

/// Revision of a stored document, bumped once per load-mutate-save cycle.
///
/// Repositories compare the stored revision with the one a document was
/// loaded at and reject the write when they differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// Revision of a document that has never been stored.
    pub fn initial() -> Self {
        Self(1)
    }

    /// Creates a revision from a stored value.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the next revision.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the raw revision.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// DocumentSource - Where a version's content came from
// ════════════════════════════════════════════════════════════════════════════════

/// Repository-relative path of the source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilePath(String);

impl FilePath {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        bounded_text("file_path", raw, MAX_FILE_PATH_LEN).map(Self)
    }

    /// Restores a stored path without re-validating it.
    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Commit the source file was read at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitHash(String);

impl CommitHash {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let value = bounded_text("commit_hash", raw, MAX_COMMIT_HASH_LEN)?;
        if value.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "commit_hash",
                "must not contain whitespace",
            ));
        }
        Ok(Self(value))
    }

    /// Restores a stored hash without re-validating it.
    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// File path plus commit hash identifying the origin of a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentSource {
    file_path: FilePath,
    commit_hash: CommitHash,
}

impl DocumentSource {
    /// Creates a source, validating both parts.
    ///
    /// The file path is checked first, so an error names `file_path` when
    /// both parts are invalid.
    pub fn new(file_path: &str, commit_hash: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            file_path: FilePath::new(file_path)?,
            commit_hash: CommitHash::new(commit_hash)?,
        })
    }

    /// Assembles a source from already validated parts.
    pub fn from_parts(file_path: FilePath, commit_hash: CommitHash) -> Self {
        Self {
            file_path,
            commit_hash,
        }
    }

    pub fn file_path(&self) -> &FilePath {
        &self.file_path
    }

    pub fn commit_hash(&self) -> &CommitHash {
        &self.commit_hash
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Title / DocumentContent
// ════════════════════════════════════════════════════════════════════════════════

/// Human-readable title of a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        bounded_text("title", raw, MAX_TITLE_LEN).map(Self)
    }

    /// Restores a stored title without re-validating it.
    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque document body with a SHA-256 checksum for change detection.
///
/// Content is never trimmed or interpreted; only emptiness and size are
/// checked.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentContent {
    raw: String,
    checksum: String,
}

impl DocumentContent {
    /// Creates content, rejecting blank or oversized bodies.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        if raw.len() > MAX_CONTENT_BYTES {
            return Err(ValidationError::too_long(
                "content",
                MAX_CONTENT_BYTES,
                raw.len(),
            ));
        }
        let checksum = Self::compute_checksum(&raw);
        Ok(Self { raw, checksum })
    }

    /// Restores stored content without the emptiness and size checks.
    ///
    /// The checksum is recomputed from `raw`.
    pub(crate) fn from_stored(raw: String) -> Self {
        let checksum = Self::compute_checksum(&raw);
        Self { raw, checksum }
    }

    /// Computes SHA-256 checksum of content.
    fn compute_checksum(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Returns the raw content.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the content checksum.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Returns the content size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.raw.len()
    }

    /// Checks if content differs from another string.
    pub fn has_changed(&self, other: &str) -> bool {
        self.checksum != Self::compute_checksum(other)
    }
}

impl PartialEq for DocumentContent {
    fn eq(&self, other: &Self) -> bool {
        self.checksum == other.checksum
    }
}

impl Eq for DocumentContent {}

// ════════════════════════════════════════════════════════════════════════════════
// AccessScope / DocumentType
// ════════════════════════════════════════════════════════════════════════════════

/// Who may read a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    Public,
    Private,
}

impl AccessScope {
    /// Returns the string representation for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessScope::Public => "public",
            AccessScope::Private => "private",
        }
    }
}

impl fmt::Display for AccessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessScope {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(AccessScope::Public),
            "private" => Ok(AccessScope::Private),
            "" => Err(ValidationError::empty_field("access_scope")),
            other => Err(ValidationError::invalid_format(
                "access_scope",
                format!("unknown access scope '{}'", other),
            )),
        }
    }
}

/// Kind of runbook document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Step-by-step operational procedure.
    Procedure,
    /// Reference or background knowledge.
    Knowledge,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Procedure => "procedure",
            DocumentType::Knowledge => "knowledge",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "procedure" => Ok(DocumentType::Procedure),
            "knowledge" => Ok(DocumentType::Knowledge),
            "" => Err(ValidationError::empty_field("doc_type")),
            other => Err(ValidationError::invalid_format(
                "doc_type",
                format!("unknown document type '{}'", other),
            )),
        }
    }
}
