use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ticketdesk_core::Column;

#[derive(Parser)]
#[command(name = "ticketdesk")]
#[command(about = "Ticket list kept in a spreadsheet")]
#[command(version)]
pub struct Cli {
    /// Configuration file (JSON or TOML)
    #[arg(
        long,
        global = true,
        env = "TICKETDESK_CONFIG",
        default_value = "config.json"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the ticket table
    #[command(visible_alias = "ls")]
    List {
        /// Column filter as COLUMN=PATTERN (header label or key, e.g. Statut=ouvert)
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        /// Sort by column (header label or key, e.g. Statut or priority)
        #[arg(long, value_parser = parse_column)]
        sort: Option<Column>,

        /// Reverse the sort order
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new ticket
    Add {
        /// Ticket name
        #[arg(short, long)]
        name: String,

        /// Description text
        #[arg(short, long)]
        description: String,

        /// Program (default: first configured program)
        #[arg(short, long)]
        program: Option<String>,

        /// Status (default: first configured status)
        #[arg(short, long)]
        status: Option<String>,

        /// Priority (default: first configured priority)
        #[arg(long)]
        priority: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an existing ticket; omitted fields keep their value
    Edit {
        /// Ticket number
        number: u64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        program: Option<String>,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a ticket
    #[command(visible_alias = "rm")]
    Delete {
        /// Ticket number
        number: u64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the configured program, status and priority choices
    Choices,
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    let (column, pattern) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=PATTERN, got '{}'", s))?;
    if column.trim().is_empty() {
        return Err(format!("missing column name in '{}'", s));
    }
    Ok((column.trim().to_string(), pattern.to_string()))
}

fn parse_column(s: &str) -> Result<Column, String> {
    Column::from_label(s).ok_or_else(|| {
        let known: Vec<&str> = Column::ALL.iter().map(|c| c.key()).collect();
        format!("unknown column '{}' (expected one of: {})", s, known.join(", "))
    })
}
