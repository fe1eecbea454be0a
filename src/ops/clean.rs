//! Rule-driven record filtering that strips solvent, heteroatoms, and
//! unwanted chains from fixed-column structure files prior to downstream
//! processing.
//!
//! The cleaner streams its input line by line and writes retained records
//! byte-for-byte, so output files stay valid members of the same format with
//! no reformatting. Removal decisions are tallied per category for the run
//! report.

use crate::io::{RecordKind, StructureRecord};
use crate::ops::error::Error;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Residue names treated as water, matched independently of chain or record
/// kind.
pub const WATER_RESIDUES: [&str; 3] = ["HOH", "H2O", "WAT"];

/// Which chains survive cleaning.
///
/// `All` removes nothing for chain reasons. `Only` drops every record whose
/// chain column carries an identifier outside the set; records with a blank
/// chain column are always kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChainSelection {
    #[default]
    All,
    Only(HashSet<String>),
}

impl ChainSelection {
    /// Builds a selection from a possibly-empty list of chain identifiers.
    ///
    /// Identifiers are trimmed and uppercased; an empty list means `All`.
    pub fn from_list(chains: &[String]) -> Self {
        let set: HashSet<String> = chains
            .iter()
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        if set.is_empty() {
            Self::All
        } else {
            Self::Only(set)
        }
    }

    fn excludes(&self, chain_id: &str) -> bool {
        match self {
            Self::All => false,
            Self::Only(set) => {
                !chain_id.is_empty() && !set.contains(&chain_id.to_ascii_uppercase())
            }
        }
    }
}

/// Configuration switches describing which records to drop during cleaning.
///
/// Filters apply in a fixed order per record: chain exclusion, then water
/// exclusion, then heteroatom exclusion. `keep_ligands` names residues exempt
/// from heteroatom removal and is consulted only for `HETATM` records while
/// `remove_hetero` is enabled.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Drop residues named in [`WATER_RESIDUES`].
    pub remove_waters: bool,
    /// Drop `HETATM` records unless their residue is in `keep_ligands`.
    pub remove_hetero: bool,
    /// Chains to retain.
    pub keep_chains: ChainSelection,
    /// Uppercase residue names exempt from heteroatom removal.
    pub keep_ligands: HashSet<String>,
}

/// Per-category removal tallies returned by a successful clean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RemovalCounts {
    pub waters: u64,
    pub hetero_residues: u64,
    pub skipped_chains: u64,
}

/// Streams `reader` into `writer`, retaining only structure records that pass
/// every configured filter.
///
/// Retained lines are copied unchanged, terminators included, so re-running
/// the cleaner over its own output with the same configuration is a byte-level
/// no-op.
///
/// # Errors
///
/// [`Error::EmptyOutput`] when no line at all is retained, which almost always
/// signals a misconfigured filter or malformed input. I/O failures surface as
/// [`Error::Io`].
pub fn clean<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    config: &FilterConfig,
) -> Result<RemovalCounts, Error> {
    let mut counts = RemovalCounts::default();
    let mut retained: u64 = 0;
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(|e| Error::from_io(e, None))?;
        if read == 0 {
            break;
        }

        let Some(record) = StructureRecord::parse(&line) else {
            continue;
        };

        if config.keep_chains.excludes(record.chain_id()) {
            counts.skipped_chains += 1;
            continue;
        }

        let residue = record.residue_name();

        if config.remove_waters && WATER_RESIDUES.contains(&residue.as_str()) {
            counts.waters += 1;
            continue;
        }

        if config.remove_hetero
            && record.kind() == RecordKind::Hetatm
            && !config.keep_ligands.contains(&residue)
        {
            counts.hetero_residues += 1;
            continue;
        }

        writer
            .write_all(line.as_bytes())
            .map_err(|e| Error::from_io(e, None))?;
        retained += 1;
    }

    if retained == 0 {
        return Err(Error::empty_output(None));
    }

    Ok(counts)
}

/// Cleans `source` into `dest`, attaching path context to any failure.
pub fn clean_file(source: &Path, dest: &Path, config: &FilterConfig) -> Result<RemovalCounts, Error> {
    let input =
        File::open(source).map_err(|e| Error::from_io(e, Some(source.to_path_buf())))?;
    let output =
        File::create(dest).map_err(|e| Error::from_io(e, Some(dest.to_path_buf())))?;
    let mut writer = BufWriter::new(output);

    let counts = clean(BufReader::new(input), &mut writer, config).map_err(|err| match err {
        Error::EmptyOutput { .. } => Error::empty_output(Some(source.to_path_buf())),
        Error::Io { path: None, source: e } => Error::from_io(e, Some(source.to_path_buf())),
        other => other,
    })?;

    writer
        .flush()
        .map_err(|e| Error::from_io(e, Some(dest.to_path_buf())))?;

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_line(kind: &str, res: &str, chain: char) -> String {
        format!(
            "{:<6}{:>5} {:<4}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}\n",
            kind, 1, " CA", ' ', res, chain, 1, ' ', 11.104, 13.207, 10.0, 1.0, 0.0, "C"
        )
    }

    fn atom(res: &str, chain: char) -> String {
        record_line("ATOM", res, chain)
    }

    fn hetatm(res: &str, chain: char) -> String {
        record_line("HETATM", res, chain)
    }

    fn run_clean(input: &str, config: &FilterConfig) -> Result<(String, RemovalCounts), Error> {
        let mut out = Vec::new();
        let counts = clean(input.as_bytes(), &mut out, config)?;
        Ok((String::from_utf8(out).unwrap(), counts))
    }

    fn name_set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn output_is_a_subset_of_input_lines_in_order() {
        let input = format!(
            "HEADER    TEST\n{}{}{}TER\nEND\n",
            atom("ALA", 'A'),
            hetatm("HOH", 'A'),
            atom("GLY", 'A'),
        );
        let config = FilterConfig {
            remove_waters: true,
            ..Default::default()
        };

        let (output, counts) = run_clean(&input, &config).unwrap();

        let expected = format!("{}{}TER\nEND\n", atom("ALA", 'A'), atom("GLY", 'A'));
        assert_eq!(output, expected);
        assert_eq!(counts.waters, 1);
        assert_eq!(counts.hetero_residues, 0);

        for line in output.lines() {
            assert!(input.contains(line));
        }
    }

    #[test]
    fn cleaning_is_idempotent() {
        let input = format!(
            "{}{}{}TER\n",
            atom("ALA", 'A'),
            hetatm("HOH", 'B'),
            hetatm("SO4", 'A'),
        );
        let config = FilterConfig {
            remove_waters: true,
            remove_hetero: true,
            ..Default::default()
        };

        let (first, _) = run_clean(&input, &config).unwrap();
        let (second, counts) = run_clean(&first, &config).unwrap();

        assert_eq!(first, second);
        assert_eq!(counts, RemovalCounts::default());
    }

    #[test]
    fn keep_all_chains_removes_nothing_for_chain_reasons() {
        let input = format!("{}{}{}", atom("ALA", 'A'), atom("GLY", 'B'), atom("SER", 'C'));
        let config = FilterConfig::default();

        let (output, counts) = run_clean(&input, &config).unwrap();

        assert_eq!(output, input);
        assert_eq!(counts.skipped_chains, 0);
    }

    #[test]
    fn chain_selection_drops_foreign_chains_only() {
        let input = format!("{}{}{}", atom("ALA", 'A'), atom("GLY", 'B'), "TER\n");
        let config = FilterConfig {
            keep_chains: ChainSelection::from_list(&["a".to_string()]),
            ..Default::default()
        };

        let (output, counts) = run_clean(&input, &config).unwrap();

        // Blank chain column on the bare TER line is never excluded.
        assert_eq!(output, format!("{}TER\n", atom("ALA", 'A')));
        assert_eq!(counts.skipped_chains, 1);
    }

    #[test]
    fn kept_ligand_survives_hetero_removal() {
        let input = format!("{}{}{}", atom("ALA", 'A'), hetatm("HEM", 'A'), hetatm("NAG", 'A'));
        let config = FilterConfig {
            remove_hetero: true,
            keep_ligands: name_set(&["HEM"]),
            ..Default::default()
        };

        let (output, counts) = run_clean(&input, &config).unwrap();

        assert!(output.contains("HEM"));
        assert!(!output.contains("NAG"));
        assert_eq!(counts.hetero_residues, 1);
    }

    #[test]
    fn hetero_removal_ignores_atom_records() {
        // A polymer residue name outside the ligand keep-list must survive:
        // the hetero filter consults HETATM records only.
        let input = format!("{}{}", atom("MSE", 'A'), hetatm("MSE", 'A'));
        let config = FilterConfig {
            remove_hetero: true,
            ..Default::default()
        };

        let (output, counts) = run_clean(&input, &config).unwrap();

        assert_eq!(output, atom("MSE", 'A'));
        assert_eq!(counts.hetero_residues, 1);
    }

    #[test]
    fn water_removal_matches_the_fixed_residue_set() {
        let input = format!(
            "{}{}{}{}",
            hetatm("HOH", 'A'),
            hetatm("WAT", 'B'),
            atom("H2O", 'C'),
            atom("ALA", 'A'),
        );
        let config = FilterConfig {
            remove_waters: true,
            ..Default::default()
        };

        let (output, counts) = run_clean(&input, &config).unwrap();

        assert_eq!(output, atom("ALA", 'A'));
        assert_eq!(counts.waters, 3);
    }

    #[test]
    fn filters_apply_chain_then_water_then_hetero() {
        // A water on an excluded chain counts as a chain skip, not a water.
        let input = format!("{}{}", hetatm("HOH", 'B'), atom("ALA", 'A'));
        let config = FilterConfig {
            remove_waters: true,
            keep_chains: ChainSelection::from_list(&["A".to_string()]),
            ..Default::default()
        };

        let (_, counts) = run_clean(&input, &config).unwrap();

        assert_eq!(counts.skipped_chains, 1);
        assert_eq!(counts.waters, 0);
    }

    #[test]
    fn all_records_removed_is_an_error() {
        let input = format!("{}{}", hetatm("HOH", 'A'), hetatm("SO4", 'A'));
        let config = FilterConfig {
            remove_waters: true,
            remove_hetero: true,
            ..Default::default()
        };

        let err = run_clean(&input, &config).unwrap_err();
        assert!(matches!(err, Error::EmptyOutput { .. }));
    }

    #[test]
    fn clean_file_reports_the_source_path_on_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.pdb");
        let dest = dir.path().join("out.pdb");
        std::fs::write(&source, hetatm("HOH", 'A')).unwrap();

        let config = FilterConfig {
            remove_waters: true,
            ..Default::default()
        };

        let err = clean_file(&source, &dest, &config).unwrap_err();
        match err {
            Error::EmptyOutput { path } => assert_eq!(path.as_deref(), Some(source.as_path())),
            other => panic!("expected empty-output error, got {other:?}"),
        }
    }

    #[test]
    fn crlf_terminators_pass_through_unchanged() {
        let input = "ATOM      1  CA  ALA A   1      11.104  13.207  10.000  1.00  0.00           C\r\n";
        let (output, _) = run_clean(input, &FilterConfig::default()).unwrap();
        assert_eq!(output, input);
    }
}
