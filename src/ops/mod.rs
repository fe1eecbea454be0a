//! High-level operations that clean, process, and report on structure targets.
//!
//! This module groups the public entry points for batch preparation: record
//! filtering, per-target pipeline orchestration, and report aggregation. Each
//! submodule exposes a cohesive API and shares a common error type so
//! downstream consumers can compose workflows easily.

pub mod clean;
mod error;
pub mod pipeline;
pub mod report;

pub use clean::{ChainSelection, FilterConfig, RemovalCounts, clean, clean_file};

pub use pipeline::{Pipeline, PipelineConfig, StructureSource};

pub use report::{ReportAggregator, StageOutcome, TargetReport};

pub use error::Error;
