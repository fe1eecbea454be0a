//! External-tool capabilities.
//!
//! Each optional pipeline stage is backed by an executable that may or may not
//! be present on the host. The traits here are the seams the orchestrator
//! depends on: availability is a plain boolean probe, and invocation always
//! yields an [`ExecutionResult`]. Tool failure is data for the run report,
//! never control flow.

mod obabel;
mod pdb2pqr;
mod probe;

pub use obabel::OpenBabel;
pub use pdb2pqr::Pdb2Pqr;
pub use probe::{find_in_path, resolve_executable};

use serde::Serialize;
use std::path::Path;
use std::process::Command;

/// Captured result of one external process invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// The command line that was (or would have been) executed.
    pub command: String,
    /// Process exit code; `-1` when the process could not be launched or was
    /// terminated without a code.
    pub exit_code: i32,
    /// Combined stdout and stderr text.
    pub output: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Protonation at a given pH.
pub trait ProtonationTool {
    fn available(&self) -> bool;
    fn protonate(&self, input: &Path, output: &Path, ph: f64) -> ExecutionResult;
}

/// Hydrogen addition.
pub trait HydrogenTool {
    fn available(&self) -> bool;
    fn add_hydrogens(&self, input: &Path, output: &Path) -> ExecutionResult;
}

/// Conversion to the docking format.
pub trait ConversionTool {
    fn available(&self) -> bool;
    fn convert(&self, input: &Path, output: &Path) -> ExecutionResult;
}

/// Runs a command to completion, capturing stdout and stderr into one
/// diagnostic string. A spawn failure is folded into the result with exit
/// code `-1`.
pub(crate) fn run_captured(mut command: Command) -> ExecutionResult {
    let rendered = render_command(&command);
    match command.output() {
        Ok(out) => {
            let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
            if !out.stderr.is_empty() {
                text.push_str(&String::from_utf8_lossy(&out.stderr));
            }
            ExecutionResult {
                command: rendered,
                exit_code: out.status.code().unwrap_or(-1),
                output: text,
            }
        }
        Err(e) => ExecutionResult {
            command: rendered,
            exit_code: -1,
            output: format!("failed to launch: {e}"),
        },
    }
}

fn render_command(command: &Command) -> String {
    let mut rendered = command.get_program().to_string_lossy().into_owned();
    for arg in command.get_args() {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}
