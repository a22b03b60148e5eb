pub mod commands;

use clap::{Parser, Subcommand};
use crate::config::Config;
use crate::error::Result;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "release-watch")]
#[command(about = "Report new distribution releases from syndication feeds")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true, env = "RELEASE_WATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at info level even when the config asks for warn or quieter
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all feeds, record new entries and print the store (default)
    Run,

    /// Print the stored entries without fetching
    Show,

    /// Tell whether a title is already recorded
    Check {
        /// Exact entry title
        title: String,
    },

    /// Write a default configuration file
    Init,

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // These two don't need a resolved configuration
        match self.command {
            Some(Commands::Init) => return commands::init(self.config),
            Some(Commands::Completions { shell }) => {
                commands::generate_completions(shell);
                return Ok(());
            }
            _ => {}
        }

        let config = Config::resolve(self.config.as_deref())?;
        let _guard = commands::init_logging(self.debug, self.verbose, &config.logging)?;

        match self.command.unwrap_or(Commands::Run) {
            Commands::Run => commands::run(&config).await,
            Commands::Show => commands::show(&config),
            Commands::Check { title } => commands::check(&config, &title),
            Commands::Init | Commands::Completions { .. } => Ok(()),
        }
    }
}
