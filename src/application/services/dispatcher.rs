//! Sequential dispatch of planned invocations
//!
//! Every step runs, in order, whatever the previous step returned. The
//! reported status is the last step's.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::ApplicationResult;
use crate::domain::{DispatchReport, InvocationSpec, StepStatus};
use crate::exitcode;
use crate::infrastructure::traits::CommandRunner;

/// Runs invocation specs one at a time in the foreground.
pub struct DispatcherService {
    cmd: Arc<dyn CommandRunner>,
}

impl DispatcherService {
    /// Create a new dispatcher.
    pub fn new(cmd: Arc<dyn CommandRunner>) -> Self {
        Self { cmd }
    }

    /// Execute `specs` in order.
    ///
    /// When `verbose`, each invocation is echoed to `out` as `+ <argv>` followed
    /// by a blank line, and another blank line follows the step. Echo failures
    /// (e.g. a closed pipe) are logged and otherwise ignored. A step that
    /// cannot be started counts as status 127 (not found) or 126 (anything
    /// else) and dispatch carries on.
    pub fn run(
        &self,
        specs: &[InvocationSpec],
        verbose: bool,
        out: &mut dyn Write,
    ) -> ApplicationResult<DispatchReport> {
        let mut report = DispatchReport::default();

        for (n, spec) in specs.iter().enumerate() {
            if verbose {
                if let Err(e) = writeln!(out, "+ {spec}\n").and_then(|_| out.flush()) {
                    warn!("cannot echo invocation: {}", e);
                }
            }

            info!(step = n + 1, of = specs.len(), "running: {}", spec);
            let status = match self.cmd.run_foreground(spec.program(), spec.args()) {
                Ok(status) => status,
                Err(e) => {
                    error!("cannot run {}: {}", spec.program().to_string_lossy(), e);
                    spawn_failure_status(&e)
                }
            };
            info!(
                step = n + 1,
                status = status.code(),
                "finished: {}",
                spec.command().to_string_lossy()
            );

            report.executed += 1;
            report.status = status;

            if verbose {
                if let Err(e) = writeln!(out).and_then(|_| out.flush()) {
                    warn!("cannot echo step separator: {}", e);
                }
            }
        }

        Ok(report)
    }
}

fn spawn_failure_status(e: &io::Error) -> StepStatus {
    match e.kind() {
        io::ErrorKind::NotFound => StepStatus(exitcode::NOT_FOUND),
        _ => StepStatus(exitcode::CANNOT_EXECUTE),
    }
}
