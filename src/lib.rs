//! cygport front end
//!
//! Resolves `.` to the only `*.cygport` file in the working directory,
//! expands the `build` alias into `prep compile test`, optionally wraps each
//! step in a logging program, and runs the steps one after another through
//! the real cygport.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
