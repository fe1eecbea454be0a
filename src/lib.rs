//! # DockPrep
//!
//! **DockPrep** is a batch preparation engine that turns raw macromolecular structure files into docking-ready inputs. It fetches entries from the RCSB archive with bounded retries, filters their fixed-column atomic records against configurable chain, water, and heteroatom rules, and hands the cleaned structures to optional external tools for protonation, hydrogen addition, and docking-format conversion. Every target is processed in isolation and summarized in an ordered JSON report, so large batches remain auditable even when individual entries fail.
//!
//! ## Features
//!
//! - **Resilient retrieval** – A pluggable transport seam with bounded retries and a fixed inter-attempt delay keeps transient archive hiccups from killing a batch.
//! - **Schema-driven cleaning** – The legacy fixed-column record format is described by an explicit field table, and retained lines pass through byte-for-byte with per-category removal counters.
//! - **Capability-gated stages** – Protonation (PDB2PQR), hydrogen addition (OpenBabel), and PDBQT conversion run only when their executables are present; absences and non-zero exits are recorded as data instead of aborting the run.
//! - **Per-target fault isolation** – Download and filtering failures convert into report entries; the batch loop always continues and always writes the aggregated report.

pub mod io;
pub mod ops;
pub mod tools;

pub use ops::clean::{ChainSelection, FilterConfig, RemovalCounts};
pub use ops::pipeline::{Pipeline, PipelineConfig, StructureSource};
pub use ops::report::{ReportAggregator, StageOutcome, TargetReport};
pub use tools::{ExecutionResult, OpenBabel, Pdb2Pqr};
