use crate::tools::probe::{find_in_path, resolve_executable};
use crate::tools::{ConversionTool, ExecutionResult, HydrogenTool, run_captured};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

const ENV_OVERRIDE: &str = "DOCKPREP_OBABEL";
const CANDIDATES: [&str; 2] = ["obabel", "babel"];

/// OpenBabel capability backing both hydrogen addition and docking-format
/// conversion.
#[derive(Debug, Clone)]
pub struct OpenBabel {
    executable: Option<PathBuf>,
}

impl OpenBabel {
    /// Probes the environment override and the known executable names.
    pub fn detect() -> Self {
        Self {
            executable: resolve_executable(ENV_OVERRIDE, &CANDIDATES),
        }
    }

    pub fn available(&self) -> bool {
        self.executable.is_some()
    }

    /// Best-effort installation: conda first, then a pip wheel. Failures are
    /// logged and swallowed; the return value reflects availability after a
    /// fresh probe.
    pub fn try_install(&mut self) -> bool {
        info!("attempting OpenBabel install (conda, then pip fallback)");

        if let Some(conda) = find_in_path("conda") {
            let mut command = Command::new(conda);
            command.args(["install", "-c", "conda-forge", "openbabel", "-y"]);
            let result = run_captured(command);
            if result.success() {
                self.executable = resolve_executable(ENV_OVERRIDE, &CANDIDATES);
                if self.available() {
                    return true;
                }
            } else {
                warn!("conda install failed: {}", result.output.trim());
            }
        }

        if let Some(pip) = find_in_path("pip3").or_else(|| find_in_path("pip")) {
            let mut command = Command::new(pip);
            command.args(["install", "openbabel-wheel"]);
            let result = run_captured(command);
            if !result.success() {
                warn!("pip install openbabel-wheel failed: {}", result.output.trim());
            }
        }

        self.executable = resolve_executable(ENV_OVERRIDE, &CANDIDATES);
        self.available()
    }

    fn invoke(&self, input: &Path, output: &Path, add_hydrogens: bool) -> ExecutionResult {
        let Some(exe) = &self.executable else {
            return ExecutionResult {
                command: CANDIDATES[0].to_string(),
                exit_code: -1,
                output: "OpenBabel executable not found".to_string(),
            };
        };

        let mut command = Command::new(exe);
        command.arg(input).arg("-O").arg(output);
        if add_hydrogens {
            command.arg("-h");
        }
        run_captured(command)
    }
}

impl HydrogenTool for OpenBabel {
    fn available(&self) -> bool {
        self.available()
    }

    fn add_hydrogens(&self, input: &Path, output: &Path) -> ExecutionResult {
        self.invoke(input, output, true)
    }
}

impl ConversionTool for OpenBabel {
    fn available(&self) -> bool {
        self.available()
    }

    fn convert(&self, input: &Path, output: &Path) -> ExecutionResult {
        self.invoke(input, output, false)
    }
}
