//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print a one-line diagnostic (red bold "cygport:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "cygport".red().bold(), msg);
}

/// Print a diagnostic followed by a usage hint, on one line, to stderr
pub fn error_with_usage_hint(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!(
        "{}: {}.  For usage 'cygport --help'",
        "cygport".red().bold(),
        msg
    );
}
