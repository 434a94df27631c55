//! Testship CLI - Main Entry Point
//!
//! Runs integration suites, verifies environment parity against promoted
//! artifacts, and promotes new artifacts to the remote store.

use clap::{Parser, Subcommand};

mod commands;
mod output;
mod settings;

use commands::{info, push, verify, Context};
use testship_common::ToolKind;

/// Testship - integration-test artifact promotion
#[derive(Parser)]
#[command(name = "testship")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    project: settings::ProjectArgs,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tavern suite and package it on success
    VerifyTavern,

    /// Run the cypress suite and package it on success
    VerifyCypress,

    /// Verify working and promoted artifacts, then promote
    VerifyEnvironment(verify::VerifyEnvironmentArgs),

    /// Upload packaged artifacts to the remote store
    Push,

    /// Show the resolved identity and remote destinations
    Destinations,

    /// Create and list the integration directories
    Layout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let project = cli.project.into_project(cli.verbose)?;
    let ctx = Context::new(project);

    let result = match cli.command {
        Commands::VerifyTavern => verify::verify_tool(&ctx, ToolKind::Tavern).await,
        Commands::VerifyCypress => verify::verify_tool(&ctx, ToolKind::Cypress).await,
        Commands::VerifyEnvironment(args) => verify::verify_environment(&ctx, args, cli.format).await,
        Commands::Push => push::execute(&ctx).await,
        Commands::Destinations => info::destinations(&ctx, cli.format),
        Commands::Layout => info::layout(&ctx, cli.format),
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        let eager = e
            .downcast_ref::<testship_common::Error>()
            .is_some_and(testship_common::Error::is_eager);
        std::process::exit(if eager { 2 } else { 1 });
    }

    Ok(())
}
