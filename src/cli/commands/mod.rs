//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod ingest;
pub mod status;
pub mod validate;
