//! Command-line interface for the shopfront server.

use clap::{Parser, Subcommand};

/// Shopfront - catalog, accounts and reviews over a JSON API
#[derive(Debug, Parser)]
#[command(name = "shopfront")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API (the default)
    #[command(alias = "daemon")]
    Serve {
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Apply pending database migrations and exit
    Migrate,
}

impl Cli {
    /// The subcommand to run, falling back to `serve`.
    #[must_use]
    pub fn command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve { port: None })
    }
}
