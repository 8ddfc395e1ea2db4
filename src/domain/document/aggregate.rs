//! Document aggregate - A runbook document and its version history.
//!
//! The aggregate owns an append-only list of `DocumentVersion`s and a single
//! pointer to the current one. Every consistency-relevant change goes through
//! the mutators below; callers load, mutate once and save.

use crate::domain::foundation::{
    DocumentId, RepositoryId, StateMachine, Timestamp, UserId, ValidationError,
};

use super::{
    AccessScope, DocumentError, DocumentVersion, PublishState, Revision, VersionNumber,
    VersionSnapshot,
};

/// The Document aggregate root.
///
/// # Invariants
///
/// - `versions` only grows; numbers are unique and assigned `max + 1`
///   starting at 1.
/// - `current_version` is either `None` or the number of a version in
///   `versions` that has not been unpublished. Being a single `Option`, at
///   most one version can ever be current.
/// - `publish_state` is `Published` exactly when `current_version` is set.
#[derive(Debug, Clone)]
pub struct Document {
    // Identity
    id: DocumentId,
    repository_id: RepositoryId,
    owner: UserId,

    // Settings
    access_scope: AccessScope,
    is_auto_update: bool,

    // Versioning
    publish_state: PublishState,
    current_version: Option<VersionNumber>,
    versions: Vec<DocumentVersion>,

    // Concurrency
    revision: Revision,
    persisted_revision: Option<Revision>,

    // Timestamps
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Document {
    // ════════════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════════════

    /// Creates an empty, unpublished document.
    pub fn new(
        id: DocumentId,
        repository_id: RepositoryId,
        owner: UserId,
        access_scope: AccessScope,
    ) -> Result<Self, DocumentError> {
        if id.is_nil() {
            return Err(ValidationError::empty_field("document_id").into());
        }
        if repository_id.is_nil() {
            return Err(ValidationError::empty_field("repository_id").into());
        }
        let now = Timestamp::now();

        Ok(Self {
            id,
            repository_id,
            owner,
            access_scope,
            is_auto_update: false,
            publish_state: PublishState::Unpublished,
            current_version: None,
            versions: Vec::new(),
            revision: Revision::initial(),
            persisted_revision: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitutes a document from persistence, without versions.
    ///
    /// Trusted path: no business rule is re-checked. Versions are attached
    /// afterwards with [`Document::add_version`].
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DocumentId,
        repository_id: RepositoryId,
        owner: UserId,
        access_scope: AccessScope,
        is_published: bool,
        is_auto_update: bool,
        revision: Revision,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            repository_id,
            owner,
            access_scope,
            is_auto_update,
            publish_state: PublishState::from_flag(is_published),
            current_version: None,
            versions: Vec::new(),
            revision,
            persisted_revision: Some(revision),
            created_at,
            updated_at,
        }
    }

    /// Attaches a stored version during reconstruction.
    ///
    /// Fails if the version belongs to another document or its number is
    /// already present. When `is_current` is set the version becomes the
    /// current one.
    pub fn add_version(
        &mut self,
        version: DocumentVersion,
        is_current: bool,
    ) -> Result<(), DocumentError> {
        if version.document_id() != self.id {
            return Err(DocumentError::DocumentMismatch {
                expected: self.id,
                actual: version.document_id(),
            });
        }
        if self.version(version.number()).is_some() {
            return Err(DocumentError::DuplicateVersion(version.number()));
        }
        if is_current {
            self.current_version = Some(version.number());
        }
        self.versions.push(version);
        self.versions.sort_by_key(DocumentVersion::number);
        Ok(())
    }

    /// Records that the document was written to storage at its current revision.
    ///
    /// Called by repository implementations after a successful save or update
    /// on the copy they keep.
    pub fn mark_persisted(&mut self) {
        self.persisted_revision = Some(self.revision);
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════════════

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn repository_id(&self) -> RepositoryId {
        self.repository_id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn access_scope(&self) -> AccessScope {
        self.access_scope
    }

    pub fn is_auto_update(&self) -> bool {
        self.is_auto_update
    }

    pub fn is_published(&self) -> bool {
        self.publish_state.is_published()
    }

    pub fn publish_state(&self) -> PublishState {
        self.publish_state
    }

    /// Returns all versions ordered by number.
    pub fn versions(&self) -> &[DocumentVersion] {
        &self.versions
    }

    /// Returns the version with the given number.
    pub fn version(&self, number: VersionNumber) -> Option<&DocumentVersion> {
        self.versions.iter().find(|v| v.number() == number)
    }

    /// Returns the number of the current version.
    pub fn current_version_number(&self) -> Option<VersionNumber> {
        self.current_version
    }

    /// Returns the current version.
    pub fn current_version(&self) -> Option<&DocumentVersion> {
        self.current_version.and_then(|n| self.version(n))
    }

    /// Returns true if `number` is the current version.
    pub fn is_current(&self, number: VersionNumber) -> bool {
        self.current_version == Some(number)
    }

    /// Returns the highest version number, if any version exists.
    pub fn latest_version_number(&self) -> Option<VersionNumber> {
        self.versions.iter().map(DocumentVersion::number).max()
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Revision the stored copy must still have for an update to succeed.
    ///
    /// `None` for a document that has never been stored.
    pub fn expected_revision(&self) -> Option<Revision> {
        self.persisted_revision
    }

    /// Returns true if the document has never been stored.
    pub fn is_new(&self) -> bool {
        self.persisted_revision.is_none()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Mutations
    // ════════════════════════════════════════════════════════════════════════════════

    /// Appends a new version and makes it current and published.
    ///
    /// Nothing changes if the version cannot be constructed.
    pub fn publish(&mut self, snapshot: VersionSnapshot) -> Result<&DocumentVersion, DocumentError> {
        let number = self.next_version_number();
        let version = DocumentVersion::new(self.id, number, snapshot)?;
        let state = self.publish_state.transition_to(PublishState::Published)?;

        self.versions.push(version);
        self.current_version = Some(number);
        self.publish_state = state;
        self.touch();

        self.version(number).ok_or(DocumentError::VersionNotFound(number))
    }

    /// Appends a copy of an existing version's snapshot as a new current version.
    ///
    /// Used to publish an old version again after the document was
    /// unpublished: unpublished versions stay unpublished and history stays
    /// append-only.
    pub fn republish_version(
        &mut self,
        number: VersionNumber,
    ) -> Result<&DocumentVersion, DocumentError> {
        let snapshot = self
            .version(number)
            .ok_or(DocumentError::VersionNotFound(number))?
            .snapshot()
            .clone();
        self.publish(snapshot)
    }

    /// Unpublishes the current version and the document.
    pub fn unpublish(&mut self) -> Result<(), DocumentError> {
        if !self.is_published() {
            return Err(DocumentError::NotPublished {
                operation: "unpublish",
            });
        }
        let state = self.publish_state.transition_to(PublishState::Unpublished)?;
        let current = self.current_version.ok_or(DocumentError::NoCurrentVersion)?;
        let version = self
            .versions
            .iter_mut()
            .find(|v| v.number() == current)
            .ok_or(DocumentError::VersionNotFound(current))?;
        version.unpublish()?;

        self.current_version = None;
        self.publish_state = state;
        self.touch();
        Ok(())
    }

    /// Re-points the current version to an earlier published version.
    ///
    /// No version is appended or modified.
    pub fn rollback_to_version(&mut self, number: VersionNumber) -> Result<(), DocumentError> {
        if !self.is_published() {
            return Err(DocumentError::NotPublished {
                operation: "rollback",
            });
        }
        let target = self
            .version(number)
            .ok_or(DocumentError::VersionNotFound(number))?;
        if !target.is_published() {
            return Err(DocumentError::VersionUnpublished(number));
        }

        self.current_version = Some(number);
        self.touch();
        Ok(())
    }

    /// Replaces the access scope.
    pub fn update_access_scope(&mut self, scope: AccessScope) {
        self.access_scope = scope;
        self.touch();
    }

    pub fn enable_auto_update(&mut self) {
        self.is_auto_update = true;
        self.touch();
    }

    pub fn disable_auto_update(&mut self) {
        self.is_auto_update = false;
        self.touch();
    }

    fn next_version_number(&self) -> VersionNumber {
        self.latest_version_number()
            .map(|n| n.next())
            .unwrap_or_else(VersionNumber::first)
    }

    /// Updates the modification time and bumps the revision once per load.
    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.revision = self
            .persisted_revision
            .map(|r| r.next())
            .unwrap_or_else(Revision::initial);
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
