//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::generator::AUTO_GATEWAY;

#[derive(Parser)]
#[command(name = "chnroutes")]
#[command(author, version, about = "Route table generator for country IP ranges")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Generate a single file
    Render {
        /// Platform id (linux, android, mac, chinadns, routeros, windows)
        platform: String,

        /// File name from the platform's bundle (e.g. routes-up.sh)
        file: String,

        /// Gateway address, or "auto" to resolve it on the client
        #[arg(short, long, default_value = AUTO_GATEWAY)]
        gateway: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a platform's zip bundle
    Pack {
        /// Platform id (linux, android, mac, chinadns, routeros, windows)
        platform: String,

        /// Gateway address, or "auto" to resolve it on the client
        #[arg(short, long, default_value = AUTO_GATEWAY)]
        gateway: String,

        /// Output zip path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show registry statistics
    Stats,

    /// Show version
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_defaults() {
        let cli = Cli::parse_from(["chnroutes", "render", "linux", "routes-up.sh"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        match cli.command {
            Commands::Render {
                platform,
                file,
                gateway,
                output,
            } => {
                assert_eq!(platform, "linux");
                assert_eq!(file, "routes-up.sh");
                assert_eq!(gateway, "auto");
                assert!(output.is_none());
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_parse_pack_requires_output() {
        assert!(Cli::try_parse_from(["chnroutes", "pack", "routeros"]).is_err());
        let cli = Cli::parse_from([
            "chnroutes", "pack", "routeros", "-g", "10.0.0.1", "-o", "out.zip", "-c", "my.yaml",
        ]);
        assert_eq!(cli.config, PathBuf::from("my.yaml"));
        assert!(matches!(
            cli.command,
            Commands::Pack { ref gateway, .. } if gateway == "10.0.0.1"
        ));
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["chnroutes", "-q", "-v", "stats"]).is_err());
        let cli = Cli::parse_from(["chnroutes", "serve", "-v"]);
        assert!(cli.verbose);
    }
}
