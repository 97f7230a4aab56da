//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors are raised while planning, before anything is executed.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("<cygport-file> is '.' but no candidate found: no *.{suffix} file in {}", .dir.display())]
    NoCandidate { dir: PathBuf, suffix: String },

    #[error(
        "<cygport-file> is '.' but candidate not unique: {} in {}",
        .candidates.join(", "),
        .dir.display()
    )]
    NotUnique {
        dir: PathBuf,
        candidates: Vec<String>,
    },

    #[error("'.' may be given only once, found {count} occurrences")]
    SentinelRepeated { count: usize },

    #[error("cygport file '{0}' not found in the argument list")]
    PackageFileNotInArguments(String),
}

impl DomainError {
    /// True for the errors that stop `.` from resolving to a single file.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            DomainError::NoCandidate { .. }
                | DomainError::NotUnique { .. }
                | DomainError::SentinelRepeated { .. }
        )
    }
}
