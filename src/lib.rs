//! Runbook Docs - Versioned operational runbook documents
//!
//! This crate implements the document versioning aggregate of the runbook
//! platform: append-only version history, a single current version,
//! publish/unpublish/rollback, and the use cases that drive them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
