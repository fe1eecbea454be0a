//! Structured run reporting.
//!
//! One [`TargetReport`] is produced per target, in processing order, and the
//! whole sequence is serialized exactly once after the last target finishes,
//! regardless of how many targets failed along the way.

use crate::ops::clean::RemovalCounts;
use crate::ops::error::Error;
use crate::tools::ExecutionResult;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of one optional pipeline stage.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// The tool was invoked; the captured command, exit code, and combined
    /// output are echoed verbatim.
    Ran {
        #[serde(flatten)]
        result: ExecutionResult,
    },
    /// The stage was not attempted.
    Skipped { reason: String },
}

impl StageOutcome {
    pub fn ran(result: ExecutionResult) -> Self {
        Self::Ran { result }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// True when the stage ran and exited zero.
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Ran { result } if result.success())
    }
}

/// Everything recorded about one target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    /// The identifier or path exactly as supplied.
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<RemovalCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protonate: Option<StageOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_hydrogens: Option<StageOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convert: Option<StageOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TargetReport {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            resolved: None,
            cleaned: None,
            removed: None,
            protonate: None,
            add_hydrogens: None,
            convert: None,
            error: None,
        }
    }

    /// Entry for a target whose pipeline failed before completing.
    pub fn failed(input: impl Into<String>, error: impl std::fmt::Display) -> Self {
        let mut report = Self::new(input);
        report.error = Some(error.to_string());
        report
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Collects per-target reports in processing order.
#[derive(Debug, Default)]
pub struct ReportAggregator {
    entries: Vec<TargetReport>,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. Order of accumulation is the order of serialization.
    pub fn accumulate(&mut self, entry: TargetReport) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TargetReport] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the full sequence to `path` as pretty-printed JSON.
    ///
    /// Consumes the aggregator: a report document is written exactly once per
    /// run.
    pub fn finalize(self, path: &Path) -> Result<(), Error> {
        let file =
            File::create(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.entries)
            .map_err(|e| Error::from_io(e.into(), Some(path.to_path_buf())))?;
        writer
            .flush()
            .map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
        Ok(())
    }
}
