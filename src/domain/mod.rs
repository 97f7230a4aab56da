//! Domain layer: entities and planning logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod ordinal;
pub mod plan;

pub use entities::*;
pub use error::DomainError;
pub use ordinal::{OrdinalTable, UNKNOWN_ORDINAL};
pub use plan::{
    build_invocation_prefix, build_invocation_specs, expand_alias, resolve_file_reference,
    DirectoryListing, Resolution,
};

/// Expand `~` and environment variables in a path-like string.
///
/// Returns the input unchanged when a variable is undefined.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
