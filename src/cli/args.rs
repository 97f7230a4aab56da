//! CLI argument definitions using clap

use std::ffi::{OsStr, OsString};

use clap::Parser;

use crate::domain::{ParsedArguments, COMMANDS};

/// cygport is a utility for creating and building Cygwin software packages.
///
/// If CYGPORT-FILE is '.', the only *.cygport file in the current directory is
/// used. It is an error if none or more than one is present, and '.' may be
/// given only once.
///
/// Command 'build' is replaced with the commands: prep compile test
#[derive(Parser, Debug)]
#[command(name = "cygport")]
#[command(version, about, long_about)]
#[command(override_usage = "cygport [OPTIONS] <CYGPORT-FILE> <COMMAND>...")]
#[command(after_help = commands_help())]
pub struct Cli {
    /// Log via "logts -t -b log/#.<command> cygport ..."
    #[arg(short = 'l', long)]
    pub log: bool,

    /// Build package for i686 Cygwin
    #[arg(short = '4', long = "32", conflicts_with = "arch64")]
    pub arch32: bool,

    /// Build package for x86_64 Cygwin
    #[arg(short = '8', long = "64")]
    pub arch64: bool,

    /// Enable debugging messages
    #[arg(long)]
    pub debug: bool,

    // OsString: tokens are forwarded to the delegate byte for byte
    /// <CYGPORT-FILE> followed by one or more <COMMAND>s; options are only
    /// recognized before <CYGPORT-FILE>
    #[arg(
        value_name = "ARGS",
        num_args = 2..,
        required = true,
        trailing_var_arg = true
    )]
    pub args: Vec<OsString>,
}

impl Cli {
    /// `<CYGPORT-FILE>` as typed.
    pub fn cygport_file(&self) -> &OsStr {
        self.args.first().map(OsString::as_os_str).unwrap_or_default()
    }

    /// `<COMMAND>...` as typed.
    pub fn commands(&self) -> &[OsString] {
        self.args.get(1..).unwrap_or_default()
    }

    /// The part of the parsed command line the planner works on.
    pub fn parsed_arguments(&self) -> ParsedArguments {
        ParsedArguments {
            package_file: self.cygport_file().to_os_string(),
            commands: self.commands().to_vec(),
            log: self.log,
        }
    }
}

fn commands_help() -> String {
    let mut help = String::from("Commands:\n");
    for (name, description) in COMMANDS {
        help.push_str(&format!("  {name:<13} {description}\n"));
    }
    help.push_str(
        "\nThe --32 and --64 options are mutually exclusive. On Cygwin, if neither is\n\
         given, the package is built for the architecture cygport runs on.",
    );
    help
}
