//! Process exit codes (BSD sysexits.h compatible where it applies)

/// Generic failure, used when the cygport file cannot be resolved
pub const FAILURE: i32 = 1;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

/// Program exists but could not be executed (shell convention)
pub const CANNOT_EXECUTE: i32 = 126;

/// Program not found (shell convention)
pub const NOT_FOUND: i32 = 127;

/// Base added to a signal number when a step is killed by that signal
pub const SIGNAL_BASE: i32 = 128;
