//! CLI command definitions.
//!
//! The CLI drives resources and data sources directly with JSON documents,
//! which makes it easy to exercise the provider against a live Arcane
//! instance without a host.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

use crate::api::ProjectAction;
use crate::error::{ArcaneError, ConfigError, Result};

/// Arcane provider - manage an Arcane container platform declaratively.
#[derive(Parser, Debug)]
#[command(name = "arcane-provider")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the provider configuration file.
    #[arg(short, long, global = true, env = "ARCANE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Log line format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the registered resource types.
    Resources,

    /// List the registered data source types.
    DataSources,

    /// Show the attribute schema of a resource or data source.
    Schema {
        /// Type name, with or without the `arcane_` prefix.
        type_name: String,

        /// Look the name up among data sources.
        #[arg(short, long)]
        data_source: bool,
    },

    /// Resolve and validate the provider configuration.
    Validate,

    /// Read a data source.
    Read {
        /// Data source type name.
        data_source: String,

        /// Configuration document: inline JSON or @path/to/file.json.
        #[arg(short, long, default_value = "{}")]
        input: String,
    },

    /// Run a single resource operation.
    Apply {
        /// Resource type name.
        resource: String,

        /// Operation to run.
        #[command(subcommand)]
        operation: ResourceOperation,
    },

    /// Run a lifecycle action on a project.
    Project {
        /// Environment ID.
        environment_id: String,

        /// Project ID.
        project_id: String,

        /// Action to run.
        action: ProjectActionArg,
    },

    /// Fetch an agent pairing token for an environment.
    Pair {
        /// Environment ID.
        environment_id: String,

        /// Invalidate the current token and issue a new one.
        #[arg(long)]
        rotate: bool,
    },
}

/// Resource operations. Documents are inline JSON or `@file`.
#[derive(Subcommand, Debug)]
pub enum ResourceOperation {
    /// Apply defaults and plan modifiers to a configuration.
    Plan {
        /// Planned document.
        #[arg(short, long)]
        plan: String,
    },

    /// Create the object.
    Create {
        /// Planned document.
        #[arg(short, long)]
        plan: String,
    },

    /// Refresh a stored state.
    Read {
        /// Prior state.
        #[arg(short, long)]
        state: String,
    },

    /// Update the object.
    Update {
        /// Planned document.
        #[arg(short, long)]
        plan: String,

        /// Prior state.
        #[arg(short, long)]
        state: String,
    },

    /// Delete the object.
    Delete {
        /// Prior state.
        #[arg(short, long)]
        state: String,
    },

    /// Import an existing object by ID.
    Import {
        /// Import ID; its format depends on the resource.
        id: String,
    },
}

/// Project lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProjectActionArg {
    /// Start the project.
    Up,
    /// Stop the project.
    Down,
    /// Pull and recreate.
    Redeploy,
    /// Pull images.
    Pull,
}

impl From<ProjectActionArg> for ProjectAction {
    fn from(arg: ProjectActionArg) -> Self {
        match arg {
            ProjectActionArg::Up => Self::Up,
            ProjectActionArg::Down => Self::Down,
            ProjectActionArg::Redeploy => Self::Redeploy,
            ProjectActionArg::Pull => Self::Pull,
        }
    }
}

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// Format of log lines written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Parses a JSON document argument. A leading `@` reads the document from
/// the named file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the content is not JSON.
pub fn parse_document(argument: &str) -> Result<Value> {
    let (content, source) = match argument.strip_prefix('@') {
        Some(path) => (std::fs::read_to_string(path)?, Some(path.to_string())),
        None => (argument.to_string(), None),
    };

    serde_json::from_str(&content).map_err(|e| {
        ArcaneError::Config(ConfigError::ParseError {
            message: format!("invalid JSON document: {e}"),
            location: source,
        })
    })
}
