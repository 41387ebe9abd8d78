//! Arcane provider CLI entrypoint.
//!
//! This is the main entrypoint for the arcane-provider command-line tool.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use arcane_provider::api::{ArcaneClient, ProjectAction};
use arcane_provider::cli::{
    Cli, Commands, LogFormat, OutputFormatter, ProjectActionArg, ResourceOperation,
    parse_document,
};
use arcane_provider::config::{
    ConfigParser, ConfigValidator, DEFAULT_ENDPOINT, ProviderConfig, find_config_file,
};
use arcane_provider::error::Result;
use arcane_provider::provider::ArcaneProvider;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system. `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: bool, format: LogFormat) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Resources => cmd_resources(&formatter),
        Commands::DataSources => cmd_data_sources(&formatter),
        Commands::Schema {
            type_name,
            data_source,
        } => cmd_schema(&type_name, data_source, &formatter),
        Commands::Validate => cmd_validate(cli.config.as_ref(), &formatter),
        Commands::Read { data_source, input } => {
            cmd_read(cli.config.as_ref(), &data_source, &input, &formatter).await
        }
        Commands::Apply {
            resource,
            operation,
        } => cmd_apply(cli.config.as_ref(), &resource, operation, &formatter).await,
        Commands::Project {
            environment_id,
            project_id,
            action,
        } => {
            cmd_project(
                cli.config.as_ref(),
                &environment_id,
                &project_id,
                action,
                &formatter,
            )
            .await
        }
        Commands::Pair {
            environment_id,
            rotate,
        } => cmd_pair(cli.config.as_ref(), &environment_id, rotate, &formatter).await,
    }
}

/// Loads the provider configuration file and its `.env` companion.
///
/// Without a file the configuration comes from the environment alone.
fn load_config(config_path: Option<&PathBuf>) -> Result<ProviderConfig> {
    let path = match config_path {
        Some(path) => Some(path.clone()),
        None => find_config_file(std::env::current_dir()?),
    };

    let Some(path) = path else {
        debug!("No configuration file found, using environment only");
        ConfigParser::new().load_dotenv()?;
        return Ok(ProviderConfig::default());
    };

    let parser = ConfigParser::new().with_base_path(path.parent().unwrap_or_else(|| Path::new(".")));
    parser.load_dotenv()?;
    parser.load_file(&path)
}

/// Builds a configured provider.
fn configured_provider(config_path: Option<&PathBuf>) -> Result<ArcaneProvider> {
    let config = load_config(config_path)?;
    ArcaneProvider::configure(&config)
}

/// Builds a provider for commands that never reach the API.
fn offline_provider() -> Result<ArcaneProvider> {
    Ok(ArcaneProvider::new(ArcaneClient::new(DEFAULT_ENDPOINT, "")?))
}

/// List resource types.
fn cmd_resources(formatter: &OutputFormatter) -> Result<()> {
    let provider = offline_provider()?;
    let types: Vec<(&str, &str)> = provider
        .resources()
        .iter()
        .map(|r| (r.type_name(), r.schema().description))
        .collect();

    println!("{}", formatter.format_types("Resources", &types));
    Ok(())
}

/// List data source types.
fn cmd_data_sources(formatter: &OutputFormatter) -> Result<()> {
    let provider = offline_provider()?;
    let types: Vec<(&str, &str)> = provider
        .data_sources()
        .iter()
        .map(|d| (d.type_name(), d.schema().description))
        .collect();

    println!("{}", formatter.format_types("Data sources", &types));
    Ok(())
}

/// Show a schema.
fn cmd_schema(type_name: &str, data_source: bool, formatter: &OutputFormatter) -> Result<()> {
    let provider = offline_provider()?;
    let (name, schema) = if data_source {
        let source = provider.data_source(type_name)?;
        (source.type_name(), source.schema())
    } else {
        let resource = provider.resource(type_name)?;
        (resource.type_name(), resource.schema())
    };

    println!("{}", formatter.format_schema(name, &schema));
    Ok(())
}

/// Validate the provider configuration.
fn cmd_validate(config_path: Option<&PathBuf>, formatter: &OutputFormatter) -> Result<()> {
    let config = load_config(config_path)?;
    let settings = ConfigValidator::new().resolve(&config)?;

    println!("{}", formatter.format_settings(&settings));
    println!("{}", formatter.success("Configuration is valid"));
    Ok(())
}

/// Read a data source.
async fn cmd_read(
    config_path: Option<&PathBuf>,
    type_name: &str,
    input: &str,
    formatter: &OutputFormatter,
) -> Result<()> {
    let document = parse_document(input)?;
    let provider = configured_provider(config_path)?;
    let source = provider.data_source(type_name)?;

    info!("Reading data source {}", source.type_name());
    let result = source.read(document).await?;

    println!("{}", formatter.format_document(&source.schema(), &result));
    Ok(())
}

/// Run one resource operation.
async fn cmd_apply(
    config_path: Option<&PathBuf>,
    type_name: &str,
    operation: ResourceOperation,
    formatter: &OutputFormatter,
) -> Result<()> {
    let provider = configured_provider(config_path)?;
    let resource = provider.resource(type_name)?;
    let schema = resource.schema();

    let document = match operation {
        ResourceOperation::Plan { plan } => resource.plan(parse_document(&plan)?).await?,
        ResourceOperation::Create { plan } => {
            let plan = resource.plan(parse_document(&plan)?).await?;
            resource.create(plan).await?
        }
        ResourceOperation::Read { state } => {
            match resource.read(parse_document(&state)?).await? {
                Some(state) => state,
                None => {
                    println!(
                        "{}",
                        formatter.warning(&format!(
                            "{} no longer exists and would be removed from state",
                            resource.type_name()
                        ))
                    );
                    return Ok(());
                }
            }
        }
        ResourceOperation::Update { plan, state } => {
            let plan = resource.plan(parse_document(&plan)?).await?;
            resource.update(plan, parse_document(&state)?).await?
        }
        ResourceOperation::Delete { state } => {
            resource.delete(parse_document(&state)?).await?;
            println!(
                "{}",
                formatter.success(&format!("Deleted {}", resource.type_name()))
            );
            return Ok(());
        }
        ResourceOperation::Import { id } => resource.import(&id).await?,
    };

    println!("{}", formatter.format_document(&schema, &document));
    Ok(())
}

/// Run a project lifecycle action.
async fn cmd_project(
    config_path: Option<&PathBuf>,
    environment_id: &str,
    project_id: &str,
    action: ProjectActionArg,
    formatter: &OutputFormatter,
) -> Result<()> {
    let provider = configured_provider(config_path)?;
    let action = ProjectAction::from(action);

    info!("Running {action} on project {project_id} in environment {environment_id}");
    provider
        .client()
        .project_action(environment_id, project_id, action)
        .await?;

    println!(
        "{}",
        formatter.success(&format!("Project {project_id}: {action} completed"))
    );
    Ok(())
}

/// Fetch an agent pairing token.
async fn cmd_pair(
    config_path: Option<&PathBuf>,
    environment_id: &str,
    rotate: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let provider = configured_provider(config_path)?;
    let token = provider.client().pair_agent(environment_id, rotate).await?;

    println!(
        "{}",
        formatter.success(&format!("Pairing token for environment {environment_id}: {token}"))
    );
    Ok(())
}
