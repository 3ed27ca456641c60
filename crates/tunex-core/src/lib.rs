pub mod config;
pub mod construction;
pub mod extraction;
pub mod fallback;
pub mod interception;
pub mod ledger;
pub mod logging;
pub mod lowering;
pub mod models;
pub mod registry;
pub mod target_resolution;

pub use extraction::{ExtractionReport, SkippedInvocation, TaskExtractor};
