//! Command-line argument parsing
//!
//! The binary takes a config-file override and an optional subcommand;
//! with no subcommand it runs the HTTP server.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "snaplink", version, about = "URL shortener with click analytics")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print a sample configuration file to stdout and exit
    InitConfig,
}
