//! Command execution: plan, then dispatch

use std::ffi::OsString;
use std::io::Write;

use tracing::{debug, instrument};

use crate::cli::args::Cli;
use crate::cli::error::CliResult;
use crate::config::Settings;
use crate::domain::StepStatus;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Load settings for the current directory, then plan and run the command line.
///
/// `raw` is the full argument vector `cli` was parsed from.
#[instrument(skip_all)]
pub fn execute_command(cli: &Cli, raw: &[OsString]) -> CliResult<StepStatus> {
    let working_dir =
        std::env::current_dir().map_err(|e| InfraError::io("read current directory", e))?;
    let settings = Settings::load(Some(&working_dir))?;
    debug!("effective settings:\n{}", settings.to_toml()?);

    let container = ServiceContainer::new(settings, working_dir);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&container, cli, raw, &mut out)
}

/// Plan and dispatch with the given services, echoing to `out`.
///
/// Planning errors return before anything is spawned or written.
pub fn run(
    container: &ServiceContainer,
    cli: &Cli,
    raw: &[OsString],
    out: &mut dyn Write,
) -> CliResult<StepStatus> {
    let parsed = cli.parsed_arguments();
    let plan = container.planner().plan(raw, &parsed)?;
    debug!(
        "run: package_file={:?}, commands={:?}",
        plan.package_file, plan.commands
    );

    let report = container.dispatcher().run(&plan.specs, plan.verbose, out)?;
    debug!(
        "run: executed {} step(s), final status {}",
        report.executed, report.status
    );
    Ok(report.status)
}
