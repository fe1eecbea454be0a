use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};

use dock_prep::io::rcsb_retriever;
use dock_prep::ops::{ChainSelection, FilterConfig, Pipeline, PipelineConfig};
use dock_prep::tools::{OpenBabel, Pdb2Pqr};

const REPORT_FILENAME: &str = "dockprep_report.json";

#[derive(Parser, Debug)]
#[command(
    name = "dockprep",
    about = "A command-line tool that fetches, cleans, and prepares macromolecular structures for docking.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// 4-character archive identifier or local structure path.
    #[arg(value_name = "TARGET", required_unless_present = "batch_file")]
    target: Option<String>,
    /// Directory receiving fetched, cleaned, and converted files.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,
    /// Keep crystallographic waters instead of removing them.
    #[arg(long)]
    keep_waters: bool,
    /// Keep heteroatom records instead of removing them.
    #[arg(long)]
    keep_hetero: bool,
    /// Comma-separated chain IDs to keep, e.g. 'A,C'. Default keeps all.
    #[arg(long, value_name = "CHAINS", value_delimiter = ',')]
    keep_chains: Vec<String>,
    /// Comma-separated ligand residue names exempt from heteroatom removal,
    /// e.g. 'NAD,HEM'.
    #[arg(long, value_name = "RESIDUES", value_delimiter = ',')]
    keep_ligands: Vec<String>,
    /// Add hydrogens using OpenBabel.
    #[arg(long)]
    add_hydrogens: bool,
    /// Protonate using PDB2PQR at the configured pH. Takes precedence over
    /// --add-hydrogens.
    #[arg(long)]
    protonate: bool,
    /// Skip the final docking-format (PDBQT) conversion.
    #[arg(long)]
    no_convert: bool,
    /// pH used for protonation.
    #[arg(long, value_name = "FLOAT", default_value_t = 7.4)]
    ph: f64,
    /// Newline-separated file of identifiers or paths to process as a batch.
    #[arg(long, value_name = "FILE")]
    batch_file: Option<PathBuf>,
    /// Download attempts per identifier before giving up.
    #[arg(long, value_name = "INT", default_value_t = 3)]
    retries: u32,
    /// Per-request download timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    timeout: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let targets = resolve_targets(&cli)?;

    fs::create_dir_all(&cli.out_dir).with_context(|| {
        format!("Failed to create output directory {}", cli.out_dir.display())
    })?;

    let config = PipelineConfig {
        out_dir: cli.out_dir.clone(),
        filter: FilterConfig {
            remove_waters: !cli.keep_waters,
            remove_hetero: !cli.keep_hetero,
            keep_chains: ChainSelection::from_list(&cli.keep_chains),
            keep_ligands: build_name_set(&cli.keep_ligands),
        },
        add_hydrogens: cli.add_hydrogens,
        protonate: cli.protonate,
        convert: !cli.no_convert,
        ph: cli.ph,
    };

    let retriever = rcsb_retriever(cli.retries, Duration::from_secs(cli.timeout))
        .context("Failed to build the structure retriever")?;

    let mut obabel = OpenBabel::detect();
    if (config.add_hydrogens || config.convert) && !obabel.available() {
        warn!("OpenBabel not found, attempting best-effort install");
        obabel.try_install();
    }
    let pdb2pqr = Pdb2Pqr::detect();

    let pipeline = Pipeline::new(&config, &retriever, &pdb2pqr, &obabel, &obabel);
    let reports = pipeline.run(&targets);

    let failures = reports.entries().iter().filter(|e| e.is_failure()).count();
    let report_path = cli.out_dir.join(REPORT_FILENAME);
    reports.finalize(&report_path).with_context(|| {
        format!("Failed to write the run report to {}", report_path.display())
    })?;

    info!(
        "finished: {} target(s), {} failure(s), report at {}",
        targets.len(),
        failures,
        report_path.display()
    );

    Ok(())
}

/// Builds the target list: a parsed batch file, or the single positional
/// target. A referenced batch file that does not exist is fatal to the whole
/// invocation.
fn resolve_targets(cli: &Cli) -> Result<Vec<String>> {
    if let Some(batch) = &cli.batch_file {
        if !batch.exists() {
            bail!("Batch file not found: {}", batch.display());
        }
        let content = fs::read_to_string(batch)
            .with_context(|| format!("Failed to read batch file {}", batch.display()))?;
        return Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect());
    }

    match &cli.target {
        Some(target) => Ok(vec![target.clone()]),
        None => bail!("Provide a TARGET or --batch-file."),
    }
}

/// Normalizes residue name lists to uppercase hash sets.
fn build_name_set(values: &[String]) -> HashSet<String> {
    values
        .iter()
        .map(|v| v.trim().to_ascii_uppercase())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_lines_are_trimmed_and_blank_lines_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let batch = dir.path().join("targets.txt");
        fs::write(&batch, "1abc\n\n  4hhb  \n\n./local.pdb\n").unwrap();

        let cli = Cli::parse_from([
            "dockprep",
            "--batch-file",
            batch.to_str().unwrap(),
        ]);
        let targets = resolve_targets(&cli).unwrap();

        assert_eq!(targets, ["1abc", "4hhb", "./local.pdb"]);
    }

    #[test]
    fn missing_batch_file_is_fatal() {
        let cli = Cli::parse_from(["dockprep", "--batch-file", "/nonexistent/targets.txt"]);
        assert!(resolve_targets(&cli).is_err());
    }

    #[test]
    fn name_sets_are_uppercased() {
        let set = build_name_set(&[" hem ".to_string(), "nad".to_string(), String::new()]);
        assert!(set.contains("HEM"));
        assert!(set.contains("NAD"));
        assert_eq!(set.len(), 2);
    }
}
