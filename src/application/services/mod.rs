//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner)
//! but are themselves concrete structs, not traits.

mod dispatcher;
mod planner;

pub use dispatcher::DispatcherService;
pub use planner::{Plan, PlannerService};
