//! Export orchestration
//!
//! This module provides the run-level logic of Xtractor:
//! - Per-record document assembly ([`RecordBuilder`])
//! - Redirect and aggregate documents
//! - The pipeline state machine and its coordinator
//! - Summary and reporting

pub mod accumulator;
pub mod aggregate;
pub mod builder;
pub mod coordinator;
pub mod output;
pub mod pipeline;
pub mod redirects;
pub mod summary;

pub use accumulator::RunAccumulator;
pub use aggregate::AggregateWriter;
pub use builder::{BuiltRecord, RecordBuilder};
pub use coordinator::{ExportCoordinator, ExportOptions};
pub use pipeline::{ExportPipeline, PipelineSettings, PipelineState};
pub use redirects::{RedirectCollector, RedirectEntry, RedirectWriter};
pub use summary::{ExportSummary, ExportWarning, WarningKind};
