// Watermark resolution for incremental and backfill runs

pub mod request;
pub mod resolver;

pub use request::IngestionRequest;
pub use resolver::{resolve_range, WatermarkResolver};
