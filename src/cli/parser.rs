use crate::core::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rSleepTracker
#[derive(Parser)]
#[command(
    name = "rsleeptracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "A simple sleep tracker: record nights, rate them and review them, stored in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Start tracking a night
    Start,

    /// Stop the night in progress
    Stop,

    /// Rate a night from 0 (very bad) to 5 (excellent)
    Rate {
        /// Night id, as shown by `list`
        id: i64,

        #[arg(value_parser = clap::value_parser!(i32).range(0..=5))]
        quality: i32,
    },

    /// Delete every recorded night
    Clear,

    /// List all nights, newest first
    List,

    /// Show the details of one night
    Show {
        /// Night id, as shown by `list`
        id: i64,
    },

    /// Interactive session (start, stop, rate, clear, list, show)
    Shell,

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Export all nights
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },
}
