//! Parsing of primitive handler input into domain value objects.
//!
//! Every parser records failures into a shared `ValidationErrors` batch so a
//! caller learns about all invalid fields at once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::domain::document::{
    AccessScope, CommitHash, DocumentContent, DocumentSource, DocumentType, FilePath, Tag, Title,
    VariableDefinition, VersionNumber, VersionSnapshot,
};
use crate::domain::foundation::{
    DocumentId, RepositoryId, UserId, ValidationError, ValidationErrors,
};

/// A variable definition as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableInput {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub var_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
}

/// The content of a new version as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionInput {
    pub file_path: String,
    pub commit_hash: String,
    pub title: String,
    pub doc_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variables: Vec<VariableInput>,
    pub content: String,
}

impl VersionInput {
    /// Parses every field, recording each failure.
    ///
    /// Returns the snapshot only when all fields are valid.
    pub(crate) fn parse(&self, errors: &mut ValidationErrors) -> Option<VersionSnapshot> {
        let file_path = errors.collect(FilePath::new(&self.file_path));
        let commit_hash = errors.collect(CommitHash::new(&self.commit_hash));
        let title = errors.collect(Title::new(&self.title));
        let doc_type = errors.collect(DocumentType::from_str(&self.doc_type));
        let tags = parse_tags(&self.tags, errors);
        let variables = parse_variables(&self.variables, errors);
        let content = errors.collect(DocumentContent::new(self.content.as_str()));

        Some(VersionSnapshot::new(
            DocumentSource::from_parts(file_path?, commit_hash?),
            title?,
            doc_type?,
            tags?,
            variables?,
            content?,
        ))
    }
}

fn parse_tags(raw: &[String], errors: &mut ValidationErrors) -> Option<BTreeSet<Tag>> {
    let before = errors.len();
    let tags: BTreeSet<Tag> = raw
        .iter()
        .enumerate()
        .filter_map(|(i, tag)| {
            errors.collect(Tag::parse(tag).map_err(|e| e.with_field(format!("tags[{}]", i))))
        })
        .collect();
    (errors.len() == before).then_some(tags)
}

fn parse_variables(
    raw: &[VariableInput],
    errors: &mut ValidationErrors,
) -> Option<Vec<VariableDefinition>> {
    let before = errors.len();
    let variables: Vec<VariableDefinition> = raw
        .iter()
        .enumerate()
        .filter_map(|(i, v)| {
            let parsed = VariableDefinition::new(
                &v.name,
                &v.label,
                &v.var_type,
                v.required,
                v.default_value.clone(),
            )
            .map_err(|e| {
                let field = format!("variables[{}].{}", i, e.field());
                e.with_field(field)
            });
            errors.collect(parsed)
        })
        .collect();
    (errors.len() == before).then_some(variables)
}

pub(crate) fn parse_document_id(raw: &str, errors: &mut ValidationErrors) -> Option<DocumentId> {
    errors.collect(DocumentId::parse(raw))
}

pub(crate) fn parse_repository_id(
    raw: &str,
    errors: &mut ValidationErrors,
) -> Option<RepositoryId> {
    errors.collect(RepositoryId::parse(raw))
}

pub(crate) fn parse_owner(raw: &str, errors: &mut ValidationErrors) -> Option<UserId> {
    errors.collect(UserId::new(raw).map_err(|e| e.with_field("owner")))
}

pub(crate) fn parse_access_scope(raw: &str, errors: &mut ValidationErrors) -> Option<AccessScope> {
    errors.collect(AccessScope::from_str(raw))
}

pub(crate) fn parse_doc_type(raw: &str, errors: &mut ValidationErrors) -> Option<DocumentType> {
    errors.collect(DocumentType::from_str(raw))
}

pub(crate) fn parse_version_number(
    raw: i64,
    errors: &mut ValidationErrors,
) -> Option<VersionNumber> {
    errors.collect(VersionNumber::new(raw))
}

pub(crate) fn parse_tag(raw: &str, errors: &mut ValidationErrors) -> Option<Tag> {
    errors.collect(Tag::parse(raw).map_err(|e: ValidationError| e.with_field("tag")))
}

#[cfg(test)]
pub(crate) fn version_input(title: &str, commit: &str, content: &str) -> VersionInput {
    VersionInput {
        file_path: "docs/a.md".to_string(),
        commit_hash: commit.to_string(),
        title: title.to_string(),
        doc_type: "procedure".to_string(),
        tags: Vec::new(),
        variables: Vec::new(),
        content: content.to_string(),
    }
}
