//! Library components of the `scrub` command-line tool.

pub mod io;
pub mod logging;
