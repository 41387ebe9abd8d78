//! CLI module for the Arcane provider.
//!
//! This module provides the command-line interface that drives resources
//! and data sources against a live Arcane instance.

mod commands;
mod output;

pub use commands::{
    Cli, Commands, LogFormat, OutputFormat, ProjectActionArg, ResourceOperation, parse_document,
};
pub use output::OutputFormatter;
