//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use walkdir::WalkDir;

use crate::domain::StepStatus;
use crate::exitcode;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Names of the regular files directly inside `dir` (no recursion).
    fn list_files(&self, dir: &Path) -> io::Result<Vec<OsString>>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run `program` in the foreground with inherited stdio and wait for it.
    ///
    /// Errors only when the process cannot be started; a non-zero exit is an
    /// `Ok` status.
    fn run_foreground(&self, program: &OsStr, args: &[OsString]) -> io::Result<StepStatus>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn list_files(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            // follows symlinks, so a link to a cygport file counts
            if !entry.path().is_file() {
                continue;
            }
            names.push(entry.file_name().to_os_string());
        }
        names.sort();
        Ok(names)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run_foreground(&self, program: &OsStr, args: &[OsString]) -> io::Result<StepStatus> {
        let status = Command::new(program).args(args).status()?;
        Ok(step_status(status))
    }
}

/// Map a process exit to a shell-style status: the exit code, or
/// `128 + signal` when the process was killed.
fn step_status(status: ExitStatus) -> StepStatus {
    if let Some(code) = status.code() {
        return StepStatus(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return StepStatus(exitcode::SIGNAL_BASE + signal);
        }
    }
    StepStatus(exitcode::SOFTWARE)
}
