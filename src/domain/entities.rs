//! Domain entities: core data structures

use std::ffi::{OsStr, OsString};
use std::fmt;

/// Package-file reference meaning "the only cygport file in the working directory".
pub const SENTINEL: &str = ".";

/// Composite command expanded by the planner.
pub const BUILD_ALIAS: &str = "build";

/// Commands substituted for every occurrence of [`BUILD_ALIAS`], in order.
pub const BUILD_EXPANSION: [&str; 3] = ["prep", "compile", "test"];

/// Long spelling of the logging flag.
pub const LOG_FLAG_LONG: &str = "--log";

/// Short spelling of the logging flag, without the dash.
pub const LOG_FLAG_SHORT: char = 'l';

/// Commands understood by the delegate, with one-line descriptions.
pub const COMMANDS: &[(&str, &str)] = &[
    ("download", "download upstream sources from Internet"),
    ("prep", "create working directory, unpack sources and apply patches"),
    ("compile", "run all compilation steps"),
    ("test", "run the package's test suite, if one exists"),
    ("build", "alias for [ prep compile test ]"),
    ("install", "install into a DESTDIR, and run post-installation steps"),
    ("package", "create binary and source packages"),
    ("package-test", "create binary and source packages, marked as test"),
    ("upload", "upload finished packages to cygwin.com"),
    ("announce", "send an announcement email to cygwin.com"),
    ("finish", "delete the working directory"),
    ("all", "run prep, compile, install and package"),
];

/// The subset of parsed arguments the planner consumes.
///
/// Architecture and debug options are not represented here: they stay in the
/// raw argument prefix and reach the delegate untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArguments {
    /// `<cygport-file>` as typed, possibly [`SENTINEL`]
    pub package_file: OsString,
    /// `<command>...` in order, may contain duplicates and [`BUILD_ALIAS`]
    pub commands: Vec<OsString>,
    /// `--log` / `-l` given
    pub log: bool,
}

/// How each step is wrapped when logging is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogWrapper {
    /// Wrapper program, e.g. `logts`
    pub program: String,
    /// Flag asking the wrapper to timestamp lines
    pub timestamp_flag: String,
    /// Flag preceding the log file path
    pub log_file_flag: String,
    /// Directory holding the per-step log files
    pub log_dir: String,
}

impl LogWrapper {
    /// Log file for `command`: `<log_dir>/<ordinal>.<command>`.
    pub fn log_file(&self, ordinal: u8, command: &OsStr) -> OsString {
        let mut file = OsString::from(format!("{}/{}.", self.log_dir, ordinal));
        file.push(command);
        file
    }
}

/// One planned external call.
///
/// Tokens are kept as `OsString` so arguments that are not valid UTF-8 reach
/// the delegate byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    argv: Vec<OsString>,
}

impl InvocationSpec {
    pub fn new(argv: Vec<OsString>) -> Self {
        Self { argv }
    }

    /// Program to execute (first element).
    pub fn program(&self) -> &OsStr {
        self.argv.first().map(OsString::as_os_str).unwrap_or_default()
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[OsString] {
        self.argv.get(1..).unwrap_or_default()
    }

    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }

    /// The command this spec runs (last element).
    pub fn command(&self) -> &OsStr {
        self.argv.last().map(OsString::as_os_str).unwrap_or_default()
    }
}

/// Space-joined argv; invalid UTF-8 is shown lossily.
impl fmt::Display for InvocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.argv.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&token.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit status of one executed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepStatus(pub i32);

impl StepStatus {
    pub const SUCCESS: StepStatus = StepStatus(0);

    pub fn code(self) -> i32 {
        self.0
    }

    pub fn success(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of dispatching a whole sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// Number of steps executed
    pub executed: usize,
    /// Status of the last step, success when nothing ran
    pub status: StepStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(argv: &[&str]) -> InvocationSpec {
        InvocationSpec::new(argv.iter().map(OsString::from).collect())
    }

    #[test]
    fn given_spec_when_split_then_program_and_args_are_separated() {
        let s = spec(&["/usr/bin/cygport", "foo.cygport", "prep"]);
        assert_eq!(s.program(), "/usr/bin/cygport");
        assert_eq!(s.args(), ["foo.cygport", "prep"]);
        assert_eq!(s.command(), "prep");
        assert_eq!(s.to_string(), "/usr/bin/cygport foo.cygport prep");
    }

    #[test]
    fn given_empty_spec_then_accessors_do_not_panic() {
        let s = spec(&[]);
        assert_eq!(s.program(), "");
        assert!(s.args().is_empty());
    }

    #[test]
    fn given_wrapper_when_log_file_then_joins_dir_ordinal_and_command() {
        let wrapper = LogWrapper {
            program: "logts".into(),
            timestamp_flag: "-t".into(),
            log_file_flag: "-b".into(),
            log_dir: "log".into(),
        };
        assert_eq!(wrapper.log_file(7, OsStr::new("package-test")), "log/7.package-test");
    }
}
