//! Ticket storage trait and types.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{Column, Ticket, TicketFields, TicketFilter, WorkbookError};

/// Error type for ticket operations.
#[derive(Debug, Error)]
pub enum TicketError {
    /// The table could not be written to the backing file. The in-memory
    /// table still holds the change; it is not durable.
    #[error("Failed to save tickets to {}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: WorkbookError,
    },

    /// A filter named a column that does not exist.
    #[error("Unknown ticket column: {0}")]
    UnknownColumn(String),
}

impl TicketError {
    /// True if the error means a change was applied in memory but not
    /// persisted.
    pub fn is_save_failure(&self) -> bool {
        matches!(self, TicketError::Save { .. })
    }
}

/// What a load found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The backing file was read.
    Loaded { tickets: usize },
    /// The backing file did not exist and was created empty.
    Created,
    /// The backing file could not be read; the table was reset to empty.
    Recovered { reason: String },
}

/// Trait for ticket storage backends.
///
/// Every mutating operation persists the whole table before returning. Lookup
/// misses are not errors: `update` returns `None` and `delete` an empty list,
/// and nothing is written.
pub trait TicketStore {
    /// (Re)load the table from the backing file.
    fn load(&mut self) -> Result<LoadOutcome, TicketError>;

    /// Discard the in-memory table and read the backing file again.
    fn reload(&mut self) -> Result<LoadOutcome, TicketError> {
        self.load()
    }

    /// Write the whole table to the backing file.
    fn save(&self) -> Result<(), TicketError>;

    /// Append a ticket with the next free number, then save.
    fn add(&mut self, fields: TicketFields) -> Result<Ticket, TicketError>;

    /// Overwrite the fields of ticket `number`, then save.
    fn update(&mut self, number: u64, fields: TicketFields)
        -> Result<Option<Ticket>, TicketError>;

    /// Remove every ticket with `number`, then save. Returns the removed rows.
    fn delete(&mut self, number: u64) -> Result<Vec<Ticket>, TicketError>;

    /// Tickets matching the filter, in table order.
    fn query(&self, filter: &TicketFilter) -> Vec<Ticket>;

    /// First ticket with `number`.
    fn get(&self, number: u64) -> Option<&Ticket>;

    /// The current full table.
    fn tickets(&self) -> &[Ticket];

    /// The fixed column list.
    fn columns(&self) -> &'static [Column] {
        &Column::ALL
    }

    /// Location of the backing file.
    fn path(&self) -> &Path;

    /// Modification time of the backing file, for display.
    fn last_modified(&self) -> Option<DateTime<Utc>>;
}
