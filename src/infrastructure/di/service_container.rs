//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{DispatcherService, PlannerService};
use crate::config::Settings;
use crate::infrastructure::traits::{CommandRunner, FileSystem, RealCommandRunner, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Directory the tool was started in
    pub working_dir: PathBuf,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings, working_dir: PathBuf) -> Self {
        Self::with_deps(
            settings,
            working_dir,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        working_dir: PathBuf,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            cmd,
            working_dir,
        }
    }

    pub fn planner(&self) -> PlannerService {
        PlannerService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.settings),
            self.working_dir.clone(),
        )
    }

    pub fn dispatcher(&self) -> DispatcherService {
        DispatcherService::new(Arc::clone(&self.cmd))
    }
}
