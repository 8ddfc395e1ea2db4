//! PostgreSQL implementation of DocumentRepository.
//!
//! Documents live in `runbook_documents`, versions in
//! `runbook_document_versions`. A document row and all of its versions are
//! written in one transaction; the `revision` column guards updates.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::document::{
    AccessScope, CommitHash, Document, DocumentContent, DocumentSource, DocumentType,
    DocumentVersion, FilePath, Revision, Tag, Title, VariableDefinition, VariableRecord,
    VersionNumber, VersionSnapshot,
};
use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, RepositoryId, Timestamp, UserId, VersionId,
};
use crate::ports::{DocumentFilter, DocumentPage, DocumentRepository, ListOptions};

const DOCUMENT_COLUMNS: &str = r#"
    d.id, d.repository_id, d.owner, d.access_scope, d.is_published, d.is_auto_update,
    d.current_version, d.revision, d.created_at, d.updated_at
"#;

const VERSION_COLUMNS: &str = r#"
    id, document_id, version_number, file_path, commit_hash, title, doc_type,
    tags, variables, content, content_checksum, published_at, unpublished_at
"#;

/// Filters shared by the count and page queries of `find_published`.
///
/// Type and tag are matched against the current version.
const PUBLISHED_FILTER: &str = r#"
    FROM runbook_documents d
    JOIN runbook_document_versions v
      ON v.document_id = d.id AND v.version_number = d.current_version
    WHERE d.is_published
      AND ($1::uuid IS NULL OR d.repository_id = $1)
      AND ($2::text IS NULL OR v.doc_type = $2)
      AND ($3::text IS NULL OR d.access_scope = $3)
      AND ($4::text IS NULL OR v.tags @> jsonb_build_array($4::text))
"#;

/// PostgreSQL implementation of the DocumentRepository port.
///
/// # Usage
///
/// ```rust,ignore
/// let pool = PgPool::connect("postgres://...").await?;
/// let repo = PostgresDocumentRepository::new(pool);
///
/// repo.save(&document).await?;
/// ```
#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresDocumentRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresDocumentRepository")
            .field("pool", &"PgPool")
            .finish()
    }
}

impl PostgresDocumentRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads versions for a set of documents, grouped by document.
    async fn load_versions(
        &self,
        document_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<VersionRow>>, DomainError> {
        let rows = sqlx::query_as::<_, VersionRow>(&format!(
            "SELECT {} FROM runbook_document_versions WHERE document_id = ANY($1) ORDER BY version_number",
            VERSION_COLUMNS
        ))
        .bind(document_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut grouped: HashMap<Uuid, Vec<VersionRow>> = HashMap::new();
        for row in rows {
            grouped.entry(row.document_id).or_default().push(row);
        }
        Ok(grouped)
    }

    /// Turns a page of document rows into aggregates.
    async fn assemble(
        &self,
        rows: Vec<DocumentRow>,
        total: i64,
    ) -> Result<DocumentPage, DomainError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut versions = self.load_versions(&ids).await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let version_rows = versions.remove(&row.id).unwrap_or_default();
                row_to_document(row, version_rows)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DocumentPage {
            items,
            total: total.max(0) as u64,
        })
    }
}

/// Internal row type for `runbook_documents`.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    repository_id: Uuid,
    owner: String,
    access_scope: String,
    is_published: bool,
    is_auto_update: bool,
    current_version: Option<i32>,
    revision: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// Internal row type for `runbook_document_versions`.
#[derive(Debug, sqlx::FromRow)]
struct VersionRow {
    id: Uuid,
    document_id: Uuid,
    version_number: i32,
    file_path: String,
    commit_hash: String,
    title: String,
    doc_type: String,
    tags: Json<Vec<String>>,
    variables: Json<Vec<VariableRecord>>,
    content: String,
    content_checksum: String,
    published_at: chrono::DateTime<chrono::Utc>,
    unpublished_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn db_error(err: sqlx::Error) -> DomainError {
    DomainError::database(format!("Database error: {}", err))
}

fn invalid_column(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::InvalidFormat,
        format!("Invalid {}: {}", column, err),
    )
}

/// Restores a version row.
///
/// Text columns go through the trusted `from_stored` constructors, so rows
/// written under older limits still load. Only the version number and the
/// document type must parse.
fn row_to_version(row: VersionRow) -> Result<DocumentVersion, DomainError> {
    let number = VersionNumber::new(i64::from(row.version_number))
        .map_err(|e| invalid_column("version_number", e))?;
    let doc_type: DocumentType = row
        .doc_type
        .parse()
        .map_err(|e| invalid_column("doc_type", e))?;
    let source = DocumentSource::from_parts(
        FilePath::from_stored(row.file_path),
        CommitHash::from_stored(row.commit_hash),
    );
    let title = Title::from_stored(row.title);
    let tags: BTreeSet<Tag> = row.tags.0.iter().map(|raw| Tag::from_stored(raw)).collect();
    let variables = row
        .variables
        .0
        .into_iter()
        .map(VariableDefinition::from_stored)
        .collect();
    let content = DocumentContent::from_stored(row.content);

    if content.checksum() != row.content_checksum {
        warn!(
            document_id = %row.document_id,
            version = row.version_number,
            "Stored content checksum does not match content"
        );
    }

    let snapshot = VersionSnapshot::new(source, title, doc_type, tags, variables, content);

    Ok(DocumentVersion::reconstitute(
        VersionId::from_uuid(row.id),
        DocumentId::from_uuid(row.document_id),
        number,
        snapshot,
        Timestamp::from_datetime(row.published_at),
        row.unpublished_at.map(Timestamp::from_datetime),
    ))
}

fn row_to_document(row: DocumentRow, versions: Vec<VersionRow>) -> Result<Document, DomainError> {
    let owner = UserId::new(&row.owner).map_err(|e| invalid_column("owner", e))?;
    let access_scope: AccessScope = row
        .access_scope
        .parse()
        .map_err(|e| invalid_column("access_scope", e))?;
    let revision = u64::try_from(row.revision)
        .map(Revision::from_raw)
        .map_err(|e| invalid_column("revision", e))?;

    let mut document = Document::reconstitute(
        DocumentId::from_uuid(row.id),
        RepositoryId::from_uuid(row.repository_id),
        owner,
        access_scope,
        row.is_published,
        row.is_auto_update,
        revision,
        Timestamp::from_datetime(row.created_at),
        Timestamp::from_datetime(row.updated_at),
    );

    for version_row in versions {
        let is_current = row.current_version == Some(version_row.version_number);
        let version = row_to_version(version_row)?;
        document
            .add_version(version, is_current)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;
    }

    Ok(document)
}

fn current_version_column(document: &Document) -> Option<i32> {
    document
        .current_version_number()
        .map(|n| n.as_u32() as i32)
}

/// Inserts new versions; for existing ones only `unpublished_at` changes.
async fn upsert_versions(
    tx: &mut Transaction<'_, Postgres>,
    document: &Document,
) -> Result<(), DomainError> {
    for version in document.versions() {
        let tags: Vec<String> = version.tags().iter().map(Tag::to_string).collect();
        sqlx::query(
            r#"
            INSERT INTO runbook_document_versions (
                id, document_id, version_number, file_path, commit_hash, title, doc_type,
                tags, variables, content, content_checksum, published_at, unpublished_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (document_id, version_number)
            DO UPDATE SET unpublished_at = EXCLUDED.unpublished_at
            "#,
        )
        .bind(version.id().as_uuid())
        .bind(version.document_id().as_uuid())
        .bind(version.number().as_u32() as i32)
        .bind(version.source().file_path().as_str())
        .bind(version.source().commit_hash().as_str())
        .bind(version.title().as_str())
        .bind(version.doc_type().as_str())
        .bind(Json(tags))
        .bind(Json(version.variables()))
        .bind(version.content().raw())
        .bind(version.content().checksum())
        .bind(version.published_at().as_datetime())
        .bind(version.unpublished_at().map(|t| *t.as_datetime()))
        .execute(&mut **tx)
        .await
        .map_err(db_error)?;
    }
    Ok(())
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO runbook_documents (
                id, repository_id, owner, access_scope, is_published, is_auto_update,
                current_version, revision, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.repository_id().as_uuid())
        .bind(document.owner().as_str())
        .bind(document.access_scope().as_str())
        .bind(document.is_published())
        .bind(document.is_auto_update())
        .bind(current_version_column(document))
        .bind(document.revision().as_u64() as i64)
        .bind(document.created_at().as_datetime())
        .bind(document.updated_at().as_datetime())
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(DomainError::conflict(format!(
                    "Document {} already exists",
                    document.id()
                )));
            }
            Err(e) => return Err(db_error(e)),
        }

        upsert_versions(&mut tx, document).await?;
        tx.commit().await.map_err(db_error)?;

        debug!(document_id = %document.id(), "Saved document");
        Ok(())
    }

    async fn update(&self, document: &Document) -> Result<(), DomainError> {
        let expected = document
            .expected_revision()
            .map(|r| r.as_u64() as i64)
            .unwrap_or(0);

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE runbook_documents
            SET
                access_scope = $1,
                is_published = $2,
                is_auto_update = $3,
                current_version = $4,
                revision = $5,
                updated_at = $6
            WHERE id = $7 AND revision = $8
            "#,
        )
        .bind(document.access_scope().as_str())
        .bind(document.is_published())
        .bind(document.is_auto_update())
        .bind(current_version_column(document))
        .bind(document.revision().as_u64() as i64)
        .bind(document.updated_at().as_datetime())
        .bind(document.id().as_uuid())
        .bind(expected)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            // Check if document exists at all
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM runbook_documents WHERE id = $1)",
            )
            .bind(document.id().as_uuid())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;

            if exists {
                warn!(
                    document_id = %document.id(),
                    expected_revision = expected,
                    "Rejected update of stale document"
                );
                return Err(DomainError::conflict(
                    "Document revision mismatch - another update occurred",
                ));
            }
            return Err(DomainError::new(
                ErrorCode::DocumentNotFound,
                format!("Document {} not found", document.id()),
            ));
        }

        upsert_versions(&mut tx, document).await?;
        tx.commit().await.map_err(db_error)?;

        debug!(
            document_id = %document.id(),
            revision = %document.revision(),
            "Updated document"
        );
        Ok(())
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DomainError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {} FROM runbook_documents d WHERE d.id = $1",
            DOCUMENT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        match row {
            Some(r) => {
                let versions = self.load_versions(&[r.id]).await?.remove(&r.id);
                Ok(Some(row_to_document(r, versions.unwrap_or_default())?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_repository_id(
        &self,
        repository_id: RepositoryId,
        options: &ListOptions,
    ) -> Result<DocumentPage, DomainError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM runbook_documents WHERE repository_id = $1",
        )
        .bind(repository_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {} FROM runbook_documents d WHERE d.repository_id = $1 \
             ORDER BY d.updated_at DESC LIMIT $2 OFFSET $3",
            DOCUMENT_COLUMNS
        ))
        .bind(repository_id.as_uuid())
        .bind(i64::from(options.effective_limit()))
        .bind(i64::from(options.effective_offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        self.assemble(rows, total).await
    }

    async fn find_published(&self, filter: &DocumentFilter) -> Result<DocumentPage, DomainError> {
        let repository_id = filter.repository_id.map(|id| *id.as_uuid());
        let doc_type = filter.doc_type.map(|t| t.as_str());
        let access_scope = filter.access_scope.map(|s| s.as_str());
        let tag = filter.tag.as_ref().map(Tag::to_string);

        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) {}", PUBLISHED_FILTER))
            .bind(repository_id)
            .bind(doc_type)
            .bind(access_scope)
            .bind(tag.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {} {} ORDER BY d.updated_at DESC LIMIT $5 OFFSET $6",
            DOCUMENT_COLUMNS, PUBLISHED_FILTER
        ))
        .bind(repository_id)
        .bind(doc_type)
        .bind(access_scope)
        .bind(tag.as_deref())
        .bind(i64::from(filter.options.effective_limit()))
        .bind(i64::from(filter.options.effective_offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        self.assemble(rows, total).await
    }

    async fn find_versions_by_document_id(
        &self,
        document_id: DocumentId,
    ) -> Result<Vec<DocumentVersion>, DomainError> {
        let id = *document_id.as_uuid();
        self.load_versions(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default()
            .into_iter()
            .map(row_to_version)
            .collect()
    }

    async fn find_version_by_number(
        &self,
        document_id: DocumentId,
        number: VersionNumber,
    ) -> Result<Option<DocumentVersion>, DomainError> {
        let row = sqlx::query_as::<_, VersionRow>(&format!(
            "SELECT {} FROM runbook_document_versions WHERE document_id = $1 AND version_number = $2",
            VERSION_COLUMNS
        ))
        .bind(document_id.as_uuid())
        .bind(number.as_u32() as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(row_to_version).transpose()
    }
}
