//! docmerge - Client for a remote PDF-merge service
//!
//! Entry point for the docmerge application.

use clap::Parser;
use docmerge::cli::{Cli, Commands, ConfigCommands, MergeArgs, ReportArgs, ServeArgs};
use docmerge::config::{Config, LogFormat, LogLevel, LogOutput, LoggingConfig};
use docmerge::error::exit_code;
use docmerge::{MergeClient, SavedDocument};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let loaded = Config::load(cli.config.as_deref());

    // Logging comes up before config errors are reported, so fall back to defaults
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();

    if let Err(e) = init_logging(&cli, &logging) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(exit_code::GENERAL_ERROR as u8);
    }

    match run(&cli, loaded) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = %e.code(), "{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Initialize the tracing subscriber from CLI flags and logging config.
///
/// Logs never go to stdout, which may carry PDF bytes.
fn init_logging(
    cli: &Cli,
    logging: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = match cli.log_level() {
        Some(name) => name.parse::<LogLevel>()?,
        None => logging.level,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level.into()).into())
        .from_env_lossy();

    let writer = match (logging.output, logging.file_path.as_deref()) {
        (LogOutput::File, Some(path)) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        _ => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true);

    match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
}

/// Main application logic.
fn run(cli: &Cli, loaded: docmerge::Result<Config>) -> docmerge::Result<()> {
    if let Commands::Config(subcmd) = &cli.command {
        return cmd_config(cli, subcmd, loaded);
    }

    let mut config = loaded?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    match &cli.command {
        Commands::Merge(args) => cmd_merge(&config, args),
        Commands::Report(args) => cmd_report(&config, args),
        Commands::Serve(args) => cmd_serve(config, args),
        Commands::Config(_) => Ok(()),
    }
}

/// Handle the `merge` command.
fn cmd_merge(config: &Config, args: &MergeArgs) -> docmerge::Result<()> {
    let client = MergeClient::from_settings(&config.client)?;
    let name = args.name.as_deref();

    tracing::info!(
        upstream = %client.base_url(),
        url_count = args.urls.len(),
        output = ?args.output,
        "Merging documents"
    );

    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        match &args.output {
            Some(path) => {
                let saved = client.download_merged(&args.urls, path, name).await?;
                print_saved(&saved);
            }
            None => {
                let stream = client.merge_documents_stream(&args.urls, name).await?;
                let written = stream.pipe_to(&mut tokio::io::stdout()).await?;
                tracing::debug!(bytes = written, "PDF written to stdout");
            }
        }
        Ok(())
    })
}

/// Handle the `report` command.
fn cmd_report(config: &Config, args: &ReportArgs) -> docmerge::Result<()> {
    let client = MergeClient::from_settings(&config.client)?;

    tracing::info!(
        upstream = %client.base_url(),
        report_id = %args.id,
        output = ?args.output,
        "Fetching report"
    );

    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        match &args.output {
            Some(path) => {
                let saved = client.download_report(&args.id, path).await?;
                print_saved(&saved);
            }
            None => {
                let stream = client.generate_report_stream(&args.id).await?;
                let written = stream.pipe_to(&mut tokio::io::stdout()).await?;
                tracing::debug!(bytes = written, "PDF written to stdout");
            }
        }
        Ok(())
    })
}

/// Handle the `serve` command.
fn cmd_serve(mut config: Config, args: &ServeArgs) -> docmerge::Result<()> {
    if let Some(bind) = &args.bind {
        config.relay.bind = bind.clone();
    }
    if let Some(port) = args.port {
        config.relay.port = port;
    }
    config.validate()?;

    let client = MergeClient::from_settings(&config.client)?;
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(docmerge::serve(&config.relay, client))
}

/// Handle the `config` subcommand.
fn cmd_config(
    cli: &Cli,
    subcmd: &ConfigCommands,
    loaded: docmerge::Result<Config>,
) -> docmerge::Result<()> {
    match subcmd {
        ConfigCommands::Validate => match loaded {
            Ok(config) => {
                println!("✓ Configuration is valid");
                tracing::debug!(?config, "Validated configuration");
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid: {}", e);
                Err(e)
            }
        },
        ConfigCommands::Show => {
            let mut config = loaded?;
            cli.apply_overrides(&mut config);
            let yaml = serde_yaml::to_string(&config).map_err(|e| {
                docmerge::DocMergeError::config_with_source("Failed to serialize configuration", e)
            })?;
            println!("{}", yaml);
            Ok(())
        }
    }
}

fn print_saved(saved: &SavedDocument) {
    println!("Saved: {}", saved.path.display());
    println!("Size: {} bytes", saved.size);
    if let Some(filename) = &saved.filename {
        println!("Suggested filename: {}", filename);
    }
}
