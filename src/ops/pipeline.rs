//! Per-target preparation pipeline.
//!
//! Each target walks a fixed stage sequence: resolve the source file, clean
//! it, optionally protonate or add hydrogens (mutually exclusive), optionally
//! convert to the docking format. Resolution and cleaning failures are fatal
//! to the target; optional stages degrade to recorded skips or recorded
//! non-zero exits, and a stage that fails never advances the "processed"
//! pointer consumed by later stages.
//!
//! The batch loop isolates targets from one another: a failed target becomes
//! a failure entry in the aggregated report and processing continues with the
//! next target.

use crate::io::{NetworkFetch, Retriever};
use crate::ops::clean::{clean_file, FilterConfig};
use crate::ops::error::Error;
use crate::ops::report::{ReportAggregator, StageOutcome, TargetReport};
use crate::tools::{ConversionTool, HydrogenTool, ProtonationTool};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Source of structure files for targets that are not local paths.
pub trait StructureSource {
    fn retrieve(&self, id: &str, dest: &Path) -> Result<(), crate::io::Error>;
}

impl<F: NetworkFetch> StructureSource for Retriever<F> {
    fn retrieve(&self, id: &str, dest: &Path) -> Result<(), crate::io::Error> {
        self.fetch(id, dest)
    }
}

/// Immutable pipeline-wide settings, passed explicitly through every stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory receiving every produced file.
    pub out_dir: PathBuf,
    /// Record filters applied during cleaning.
    pub filter: FilterConfig,
    /// Request hydrogen addition. Ignored when `protonate` is also set.
    pub add_hydrogens: bool,
    /// Request pH-aware protonation.
    pub protonate: bool,
    /// Request docking-format conversion of the processed file.
    pub convert: bool,
    /// pH handed to the protonation tool.
    pub ph: f64,
}

/// Sequential batch orchestrator over a target list.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    source: &'a dyn StructureSource,
    protonator: &'a dyn ProtonationTool,
    hydrogenator: &'a dyn HydrogenTool,
    converter: &'a dyn ConversionTool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        source: &'a dyn StructureSource,
        protonator: &'a dyn ProtonationTool,
        hydrogenator: &'a dyn HydrogenTool,
        converter: &'a dyn ConversionTool,
    ) -> Self {
        Self {
            config,
            source,
            protonator,
            hydrogenator,
            converter,
        }
    }

    /// Processes every target in order, converting per-target failures into
    /// failure entries. Always returns one entry per target.
    pub fn run(&self, targets: &[String]) -> ReportAggregator {
        let mut reports = ReportAggregator::new();
        for target in targets {
            match self.process(target) {
                Ok(entry) => {
                    info!("completed {}", target);
                    reports.accumulate(entry);
                }
                Err(err) => {
                    warn!("processing {} failed: {}", target, err);
                    reports.accumulate(TargetReport::failed(target, &err));
                }
            }
        }
        reports
    }

    /// Runs the full stage sequence for one target.
    ///
    /// # Errors
    ///
    /// Only resolution and cleaning failures are returned; optional stages
    /// record their outcome in the report instead.
    pub fn process(&self, target: &str) -> Result<TargetReport, Error> {
        let label = target_label(target);
        let mut entry = TargetReport::new(target);

        // RESOLVE: an existing local path is used as-is, anything else is
        // treated as an archive identifier.
        let source_path = if Path::new(target).exists() {
            PathBuf::from(target)
        } else {
            let dest = self.config.out_dir.join(format!("{label}.pdb"));
            info!("fetching {} -> {}", label, dest.display());
            self.source.retrieve(&label, &dest)?;
            dest
        };
        entry.resolved = Some(source_path.clone());

        // CLEAN
        let cleaned = self.config.out_dir.join(format!("{label}_clean.pdb"));
        let removed = clean_file(&source_path, &cleaned, &self.config.filter)?;
        info!(
            "cleaned {}: {} waters, {} hetero, {} chain-skipped",
            label, removed.waters, removed.hetero_residues, removed.skipped_chains
        );
        entry.cleaned = Some(cleaned.clone());
        entry.removed = Some(removed);

        let mut processed = cleaned;

        // PROTONATE
        if self.config.protonate {
            if self.protonator.available() {
                let dest = self.config.out_dir.join(format!("{label}_final.pdb"));
                info!(
                    "protonating {} -> {} at pH {}",
                    processed.display(),
                    dest.display(),
                    self.config.ph
                );
                let result = self.protonator.protonate(&processed, &dest, self.config.ph);
                if result.success() {
                    processed = dest;
                } else {
                    warn!("protonation of {} exited with {}", label, result.exit_code);
                }
                entry.protonate = Some(StageOutcome::ran(result));
            } else {
                entry.protonate = Some(StageOutcome::skipped("PDB2PQR not available"));
            }
        }

        // HYDROGENATE: mutually exclusive with protonation.
        if self.config.add_hydrogens {
            if self.config.protonate {
                entry.add_hydrogens =
                    Some(StageOutcome::skipped("protonation requested instead"));
            } else if self.hydrogenator.available() {
                let dest = self.config.out_dir.join(format!("{label}_final.pdb"));
                info!("adding hydrogens {} -> {}", processed.display(), dest.display());
                let result = self.hydrogenator.add_hydrogens(&processed, &dest);
                if result.success() {
                    processed = dest;
                } else {
                    warn!(
                        "hydrogen addition for {} exited with {}",
                        label, result.exit_code
                    );
                }
                entry.add_hydrogens = Some(StageOutcome::ran(result));
            } else {
                entry.add_hydrogens = Some(StageOutcome::skipped("OpenBabel not available"));
            }
        }

        // CONVERT: consumes whatever the last successful stage produced.
        if self.config.convert {
            if self.converter.available() {
                let dest = self.config.out_dir.join(format!("{label}_final.pdbqt"));
                info!("converting {} -> {}", processed.display(), dest.display());
                let result = self.converter.convert(&processed, &dest);
                if !result.success() {
                    warn!("conversion for {} exited with {}", label, result.exit_code);
                }
                entry.convert = Some(StageOutcome::ran(result));
            } else {
                entry.convert = Some(StageOutcome::skipped("OpenBabel not available"));
            }
        }

        Ok(entry)
    }
}

/// Label used to derive every per-target filename: the file stem for local
/// paths, the uppercased identifier otherwise.
pub fn target_label(target: &str) -> String {
    let path = Path::new(target);
    if path.exists() {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.to_string())
    } else {
        target.to_ascii_uppercase()
    }
}
