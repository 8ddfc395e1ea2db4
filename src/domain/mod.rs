//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, command metadata)
//! - `document` - Runbook document aggregate and version history
pub mod document;
pub mod foundation;
