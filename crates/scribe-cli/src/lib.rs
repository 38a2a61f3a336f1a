//! Command-line harness for the scribe completion engine
//!
//! `scribe suggest` lists what the popup would show at a position, `scribe complete` applies
//! one of those suggestions and prints the resulting line, and `scribe scan` reports the
//! word buckets a content scan of a directory produces.

pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;
pub mod workspace;

pub use error::{CliError, CliResult};
pub use router::{Cli, CommandRouter, Commands};
