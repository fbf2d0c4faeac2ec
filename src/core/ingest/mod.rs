// Ingestion orchestration, loading and reporting

pub mod loader;
pub mod runner;
pub mod summary;

pub use loader::StageMergeLoader;
pub use runner::{IngestionRunner, RunParameters};
pub use summary::{FailureStage, RunSummary, SeriesFailure, SeriesOutcome, SeriesStatus};
