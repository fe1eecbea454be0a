use crate::tools::probe::resolve_executable;
use crate::tools::{ExecutionResult, ProtonationTool, run_captured};
use std::path::{Path, PathBuf};
use std::process::Command;

const ENV_OVERRIDE: &str = "DOCKPREP_PDB2PQR";
const CANDIDATES: [&str; 1] = ["pdb2pqr"];
const FORCEFIELD: &str = "PARSE";

/// PDB2PQR capability for pH-aware protonation.
#[derive(Debug, Clone)]
pub struct Pdb2Pqr {
    executable: Option<PathBuf>,
}

impl Pdb2Pqr {
    pub fn detect() -> Self {
        Self {
            executable: resolve_executable(ENV_OVERRIDE, &CANDIDATES),
        }
    }

    pub fn available(&self) -> bool {
        self.executable.is_some()
    }
}

impl ProtonationTool for Pdb2Pqr {
    fn available(&self) -> bool {
        self.available()
    }

    fn protonate(&self, input: &Path, output: &Path, ph: f64) -> ExecutionResult {
        let Some(exe) = &self.executable else {
            return ExecutionResult {
                command: CANDIDATES[0].to_string(),
                exit_code: -1,
                output: "PDB2PQR executable not found".to_string(),
            };
        };

        let mut command = Command::new(exe);
        command
            .arg(format!("--ff={FORCEFIELD}"))
            .arg(format!("--with-ph={ph}"))
            .arg(input)
            .arg(output);
        run_captured(command)
    }
}
