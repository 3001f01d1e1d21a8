//! CLI subcommand definitions

use std::path::PathBuf;

use clap::Subcommand;

use crate::output::ExportFormat;

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Summary, book table and every chart (default)
    All,
    /// Total reading time across all books
    Summary,
    /// Book table, filtered by --min-minutes and sorted by --sort/--order
    Books,
    /// Share of reading time per book
    Distribution,
    /// Hours read per calendar day
    Daily,
    /// Running total of minutes read
    Cumulative,
    /// Hours read per weekday
    Weekday,
    /// Export the book table
    Export {
        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Read commands from stdin and re-render after each one
    Shell,
}

/// Which view a one-shot command prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewCommand {
    All,
    Summary,
    Books,
    Distribution,
    Daily,
    Cumulative,
    Weekday,
}

impl ViewCommand {
    pub(crate) fn from_command(cmd: Option<&Commands>) -> Option<Self> {
        match cmd {
            None | Some(Commands::All) => Some(ViewCommand::All),
            Some(Commands::Summary) => Some(ViewCommand::Summary),
            Some(Commands::Books) => Some(ViewCommand::Books),
            Some(Commands::Distribution) => Some(ViewCommand::Distribution),
            Some(Commands::Daily) => Some(ViewCommand::Daily),
            Some(Commands::Cumulative) => Some(ViewCommand::Cumulative),
            Some(Commands::Weekday) => Some(ViewCommand::Weekday),
            Some(Commands::Export { .. } | Commands::Shell) => None,
        }
    }
}
