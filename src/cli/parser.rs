use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for rTeamline
/// Rebuilds team rosters, jobs and time entries from wages spreadsheets
#[derive(Parser)]
#[command(
    name = "rteamline",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rebuild team rosters, jobs and time entries from weekly wages spreadsheets",
    long_about = None
)]
pub struct Cli {
    /// Use this config file instead of ~/.rteamline/rteamline.conf
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Print debug diagnostics (same as RUST_LOG=debug)
    #[arg(global = true, short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration and create the staging database
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
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

    /// Rebuild the team timeline and write per-person membership intervals
    Teams {
        /// Workbook (.xlsx/.xls/.ods), single CSV file, or folder of CSV sheets
        #[arg(long = "source")]
        source: PathBuf,

        /// Output file for the membership intervals
        #[arg(long = "out")]
        out: PathBuf,

        #[arg(long = "format", value_enum, help = "Output format (default: from extension, else xlsx)")]
        format: Option<ExportFormat>,

        /// Also write the resolved periods to this file (same format)
        #[arg(long = "periods")]
        periods: Option<PathBuf>,

        /// Corrections file (overrides `corrections_file` of the config)
        #[arg(long = "corrections")]
        corrections: Option<PathBuf>,

        #[arg(long = "force", help = "Overwrite output files without asking")]
        force: bool,
    },

    /// Build jobs, time entries and customers for the downstream import
    Jobs {
        #[arg(long = "source")]
        source: PathBuf,

        /// Output workbook / JSON file, or directory for CSV
        #[arg(long = "out")]
        out: PathBuf,

        #[arg(long = "format", value_enum, help = "Output format (default: from extension, else xlsx)")]
        format: Option<ExportFormat>,

        #[arg(long = "force", help = "Overwrite output files without asking")]
        force: bool,
    },

    /// Run both pipelines and replace the staging tables
    Load {
        #[arg(long = "source")]
        source: PathBuf,

        #[arg(long = "corrections")]
        corrections: Option<PathBuf>,
    },

    /// Manage the staging database
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show row counts of the staging tables")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
