//! Metabind CLI - print table and schema metadata from the command line

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;

pub use commands::{Outcome, execute};
