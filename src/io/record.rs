//! Column schema for the legacy fixed-width structure record format.
//!
//! Every field of an atomic record occupies a fixed column range, so parsing is
//! position-addressed rather than tokenized. The ranges live in one table of
//! [`FieldSpec`] constants to keep the format self-documenting and testable
//! independently of any filtering logic.

/// A named column range within a fixed-width record line.
///
/// `start` is zero-based inclusive, `end` exclusive. Extraction clamps to the
/// line length, so short records yield empty fields instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
}

impl FieldSpec {
    pub const fn new(name: &'static str, start: usize, end: usize) -> Self {
        Self { name, start, end }
    }

    /// Extracts and trims the field from a record line.
    pub fn extract<'a>(&self, line: &'a str) -> &'a str {
        let end = self.end.min(line.len());
        if self.start >= end {
            return "";
        }
        line.get(self.start..end).unwrap_or("").trim()
    }
}

/// Record name, e.g. `ATOM`, `HETATM`, `TER`.
pub const FIELD_RECORD_NAME: FieldSpec = FieldSpec::new("record_name", 0, 6);
/// Three-letter residue name.
pub const FIELD_RESIDUE_NAME: FieldSpec = FieldSpec::new("residue_name", 17, 20);
/// Single-character chain identifier.
pub const FIELD_CHAIN_ID: FieldSpec = FieldSpec::new("chain_id", 21, 22);

/// Record kinds that survive cleaning. Everything else (headers, remarks,
/// connectivity, crystallography) is discarded by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Atom,
    Hetatm,
    Ter,
    /// `END` and `ENDMDL`.
    End,
}

impl RecordKind {
    /// Classifies a raw line by its record-name prefix.
    pub fn classify(line: &str) -> Option<Self> {
        if line.starts_with("ATOM  ") {
            Some(Self::Atom)
        } else if line.starts_with("HETATM") {
            Some(Self::Hetatm)
        } else if line.starts_with("TER") {
            Some(Self::Ter)
        } else if line.starts_with("END") {
            Some(Self::End)
        } else {
            None
        }
    }
}

/// Borrowed view over one retained record line.
///
/// The underlying text is kept verbatim; accessors decode only the fields the
/// cleaner consults. Writing `raw()` back out reproduces the input exactly.
#[derive(Debug, Clone, Copy)]
pub struct StructureRecord<'a> {
    kind: RecordKind,
    line: &'a str,
}

impl<'a> StructureRecord<'a> {
    /// Parses a line into a record view, or `None` for non-structure records.
    pub fn parse(line: &'a str) -> Option<Self> {
        RecordKind::classify(line).map(|kind| Self { kind, line })
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn chain_id(&self) -> &'a str {
        FIELD_CHAIN_ID.extract(self.line)
    }

    /// Residue name, uppercased for case-insensitive comparisons.
    pub fn residue_name(&self) -> String {
        FIELD_RESIDUE_NAME.extract(self.line).to_ascii_uppercase()
    }

    /// The untouched record line, terminator included if present.
    pub fn raw(&self) -> &'a str {
        self.line
    }
}
