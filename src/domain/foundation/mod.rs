//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, error types and the small traits
//! that form the vocabulary of the runbook document domain.

mod command;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError, ValidationErrors};
pub use ids::{DocumentId, RepositoryId, UserId, VersionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
