//! chnroutes - route table generator for country IP ranges.
//!
//! Serves per-platform routing scripts built from an RIR delegation file.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use chnroutes::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    // Logs go to stderr so `render` can stream artifacts on stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve => chnroutes::commands::serve::run(&cli.config).await,
        Commands::Render {
            platform,
            file,
            gateway,
            output,
        } => {
            chnroutes::commands::render::run(
                &platform,
                &file,
                &gateway,
                output.as_deref(),
                &cli.config,
            )
            .await
        }
        Commands::Pack {
            platform,
            gateway,
            output,
        } => chnroutes::commands::pack::run(&platform, &gateway, &output, &cli.config).await,
        Commands::Stats => chnroutes::commands::stats::run(&cli.config).await,
        Commands::Version => {
            println!("chnroutes {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
