//! Invocation planning service
//!
//! Composes the pure planning steps in `domain::plan` and supplies the one
//! piece of I/O they need: the working directory listing, read only when the
//! cygport file is given as `.`.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    build_invocation_prefix, build_invocation_specs, expand_alias, resolve_file_reference,
    DirectoryListing, InvocationSpec, OrdinalTable, ParsedArguments, BUILD_ALIAS,
    BUILD_EXPANSION,
};
use crate::infrastructure::traits::FileSystem;

/// Everything the dispatcher needs, plus what was decided on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Concrete cygport file handed to the delegate
    pub package_file: OsString,
    /// Commands after alias expansion, one per spec
    pub commands: Vec<OsString>,
    /// Invocations, in execution order
    pub specs: Vec<InvocationSpec>,
    /// Echo each invocation before running it
    pub verbose: bool,
}

/// Service turning parsed arguments into a [`Plan`].
pub struct PlannerService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    working_dir: PathBuf,
    ordinals: OrdinalTable,
}

impl PlannerService {
    /// Create a new planner rooted at `working_dir`.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>, working_dir: PathBuf) -> Self {
        Self {
            fs,
            settings,
            working_dir,
            ordinals: OrdinalTable::standard(),
        }
    }

    /// Plan the invocations for one command line.
    ///
    /// `raw` is the full argument vector including the program name. Fails
    /// only when the cygport file cannot be pinned down; nothing has been
    /// executed at that point.
    pub fn plan(&self, raw: &[OsString], parsed: &ParsedArguments) -> ApplicationResult<Plan> {
        debug!("plan: raw={:?}, parsed={:?}", raw, parsed);

        let resolution = resolve_file_reference::<ApplicationError, _>(
            raw,
            &parsed.package_file,
            || self.list_working_dir(),
        )?;
        debug!(
            "plan: package_file={} at index {}",
            resolution.package_file.to_string_lossy(),
            resolution.index
        );

        let commands = expand_alias(&parsed.commands, BUILD_ALIAS, &BUILD_EXPANSION);
        for command in commands
            .iter()
            .filter(|c| !self.ordinals.is_known(&c.to_string_lossy()))
        {
            debug!("plan: unrecognized command {:?} is forwarded as is", command);
        }

        let prefix = build_invocation_prefix(
            &resolution.raw,
            resolution.index,
            parsed.log,
            &self.settings.delegate,
        );

        let wrapper = parsed
            .log
            .then(|| self.settings.log_wrapper.to_wrapper());
        let specs = build_invocation_specs(&prefix, &commands, wrapper.as_ref(), &self.ordinals);
        debug!("plan: {} invocation(s)", specs.len());

        Ok(Plan {
            package_file: resolution.package_file,
            commands,
            specs,
            verbose: parsed.log,
        })
    }

    fn list_working_dir(&self) -> ApplicationResult<DirectoryListing> {
        let files = self.fs.list_files(&self.working_dir).map_err(|e| {
            ApplicationError::OperationFailed {
                context: format!("list directory: {}", self.working_dir.display()),
                source: Box::new(e),
            }
        })?;
        Ok(DirectoryListing {
            dir: self.working_dir.clone(),
            suffix: self.settings.package_suffix.clone(),
            files,
        })
    }
}
