///
/// This module implements the CLI interface for nina-warnings: command parsing,
/// argument validation, the async entrypoint and console output.
///
/// All aggregation logic (adapters, fetching, de-duplication, enrichment) lives in the
/// [`nina-warnings-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: use the installed `nina-warnings` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`nina-warnings-core`]: ../../nina-warnings-core/
use crate::load_config::load_or_default;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use nina_warnings_core::download::HttpTransport;
use nina_warnings_core::{Aggregator, Source, WarningMessage};
use std::path::PathBuf;

/// CLI for nina-warnings: aggregate the federal warning feeds.
#[derive(Parser)]
#[clap(
    name = "nina-warnings",
    version,
    about = "Aggregate and de-duplicate current disaster warnings from all federal sources"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the current warnings of the selected sources
    Warnings {
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Source to query, repeatable; overrides the config file (default: all)
        #[clap(long = "source")]
        sources: Vec<Source>,
        /// Load the detail document of every message
        #[clap(long)]
        details: bool,
    },
    /// List the known sources in query order
    Sources,
}

/// One console line per message, plus indented details when present.
pub fn format_message(message: &WarningMessage) -> String {
    let mut line = format!(
        "{} Uhr: ({} / {}) {}",
        message.start_date().format("%d.%m.%Y %H:%M"),
        message.content_type().description(),
        message.severity().description(),
        message.content()
    );
    if let Some(details) = message.details() {
        line.push_str(&format!("\n    {} [{}]", details.title, details.area_description));
        if !details.instruction.is_empty() {
            line.push_str(&format!("\n    {}", details.instruction));
        }
    }
    line
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Warnings {
            config,
            sources,
            details,
        } => {
            let mut config = load_or_default(config.as_deref())?;
            if !sources.is_empty() {
                config.sources = sources;
            }
            config.load_details |= details;
            config.trace_loaded();

            let transport =
                HttpTransport::new(&config.warnings).context("Failed to set up warning client")?;
            let aggregator = Aggregator::new(transport);

            tracing::info!(command = "warnings", "Starting aggregation");
            let stream = aggregator.messages(config.aggregate_request());
            futures::pin_mut!(stream);

            let mut count = 0usize;
            while let Some(item) = stream.next().await {
                let message = item
                    .map_err(|e| {
                        tracing::error!(command = "warnings", error = %e, "Aggregation failed");
                        e
                    })
                    .context("Aggregation failed")?;
                println!("{}", format_message(&message));
                count += 1;
            }
            tracing::info!(command = "warnings", count, "Aggregation complete");
            Ok(())
        }
        Commands::Sources => {
            for source in Source::ALL {
                println!("{:<8} {}", source.path_segment(), source.description());
            }
            Ok(())
        }
    }
}
