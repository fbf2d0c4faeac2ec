//! Warehouse abstraction layer
//!
//! This module provides the trait-based abstraction over the warehouse so the
//! pipeline can run against PostgreSQL or an in-memory store in tests.

pub mod factory;
pub mod traits;

pub use factory::create_observation_store;
pub use traits::{ObservationStore, StageInsertResult};
