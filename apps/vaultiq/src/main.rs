//! vaultiq - document verification CLI
//!
//! Loads configuration, wires the configured collaborator commands into a
//! verifier and renders its verdict.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands, ConfigCommands, VerifyArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use std::process;
use tokio::select;
use tracing::{error, info};
use vaultiq_config::Config;
use vaultiq_errors::Error;
use vaultiq_events::{EventEmitter, EventReceiver};
use vaultiq_types::{ColorChoice, Document, OutputFormat, VerificationResult, VerificationStatus};
use vaultiq_verifier::{Verifier, VerifierBuilder};

/// Exit status for a flagged document
const EXIT_FLAGGED: i32 = 2;

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    let format = if json_mode {
        OutputFormat::Json
    } else {
        OutputFormat::default()
    };
    let renderer = OutputRenderer::new(format, cli.global.color.unwrap_or_default());
    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {}", e);
            renderer.render_error(&e);
            process::exit(1);
        }
    }
}

/// Main application logic; returns the process exit code
async fn run(cli: Cli) -> Result<i32, CliError> {
    info!("Starting vaultiq v{}", env!("CARGO_PKG_VERSION"));

    // 1. File config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Environment variables
    config.merge_env()?;

    // 3. CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global, &cli.command);
    config.validate()?;

    let color = config.general.color;
    let format = if cli.global.json {
        OutputFormat::Json
    } else {
        config.general.default_output
    };
    let json_output = format == OutputFormat::Json;
    let renderer = OutputRenderer::new(format, color);

    match cli.command {
        Commands::Config(ConfigCommands::Show) => {
            renderer.render_text(&config.to_toml_string()?);
            Ok(0)
        }
        Commands::Config(ConfigCommands::Path) => {
            let path = match &cli.global.config {
                Some(path) => path.clone(),
                None => Config::default_path()?,
            };
            renderer.render_text(&path.display().to_string());
            Ok(0)
        }
        Commands::Verify(args) => {
            let colors_enabled = match color {
                _ if format == OutputFormat::Plain => false,
                ColorChoice::Always => true,
                ColorChoice::Never => false,
                ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
            };
            let mut event_handler = EventHandler::new(!json_output, colors_enabled);
            let result = verify(&config, args, &mut event_handler).await?;

            renderer.render_verification(&result)?;
            info!(status = %result.status, "Command completed successfully");
            Ok(match result.status {
                VerificationStatus::Approved => 0,
                VerificationStatus::Flagged => EXIT_FLAGGED,
            })
        }
    }
}

async fn verify(
    config: &Config,
    args: VerifyArgs,
    event_handler: &mut EventHandler,
) -> Result<VerificationResult, CliError> {
    let metadata = match (&args.metadata, &args.metadata_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?,
        (None, None) => {
            return Err(CliError::InvalidArguments(
                "one of --metadata or --metadata-file is required".to_string(),
            ))
        }
    };

    let document = if args.identifier {
        Document::from_identifier(args.document)
    } else if args.bytes {
        let bytes = tokio::fs::read(&args.document)
            .await
            .map_err(|e| Error::io_with_path(&e, &args.document))?;
        Document::from(bytes)
    } else {
        Document::from_path(args.document)
    };

    let (event_sender, mut event_receiver) = vaultiq_events::channel();
    let verifier = VerifierBuilder::from_config(config)
        .with_event_sender(event_sender.clone())
        .build()?;

    event_sender.emit_operation_started("verify");
    let result =
        execute_with_events(&verifier, &document, &metadata, &mut event_receiver, event_handler)
            .await;
    event_sender.emit_operation_completed("verify", result.is_ok());

    while let Ok(event) = event_receiver.try_recv() {
        event_handler.handle_event(event);
    }
    result
}

/// Run a verification while draining its events, cancelling on Ctrl-C
async fn execute_with_events(
    verifier: &Verifier,
    document: &Document,
    metadata: &str,
    event_receiver: &mut EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<VerificationResult, CliError> {
    let mut verification = Box::pin(verifier.run_verification_until(
        document,
        metadata,
        shutdown_signal(),
    ));

    loop {
        select! {
            result = &mut verification => {
                return result.map_err(CliError::from);
            }

            Some(event) = event_receiver.recv() => {
                event_handler.handle_event(event);
            }
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs, command: &Commands) {
    if let Some(color) = global.color {
        config.general.color = color;
    }

    if let Commands::Verify(args) = command {
        if let Some(threshold) = args.threshold {
            config.verification.approval_threshold = threshold;
        }
        if let Some(policy) = args.score_policy {
            config.verification.score_policy = policy;
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let filter = |default: &str| {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
    };

    if json_mode {
        if debug_enabled {
            // Structured logs stay on stderr so stdout remains valid JSON
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(filter("info,vaultiq=debug,vaultiq_verifier=debug"))
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_writer(std::io::sink)
                .with_env_filter("off")
                .init();
        }
    } else if debug_enabled {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("info,vaultiq=debug,vaultiq_verifier=debug"))
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("warn"))
            .init();
    }
}
