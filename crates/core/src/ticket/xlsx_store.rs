//! Spreadsheet-backed ticket store implementation.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::workbook;
use super::{LoadOutcome, Ticket, TicketError, TicketFields, TicketFilter, TicketStore, TicketTable};

/// Ticket store persisted in an xlsx file.
///
/// Assumes exclusive access to the file: two processes mutating the same file
/// lose updates (last writer wins).
#[derive(Debug)]
pub struct XlsxTicketStore {
    path: PathBuf,
    table: TicketTable,
}

impl XlsxTicketStore {
    /// Open the store at `path` and load it.
    ///
    /// A missing file is created empty; an unreadable one yields an empty
    /// table. Neither is fatal, so this never fails; use
    /// [`XlsxTicketStore::open_with_outcome`] to observe what the load found.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let (store, _) = Self::open_with_outcome(path);
        store
    }

    /// Like [`XlsxTicketStore::open`], also returning the result of the
    /// initial load.
    pub fn open_with_outcome(
        path: impl Into<PathBuf>,
    ) -> (Self, Result<LoadOutcome, TicketError>) {
        let mut store = Self {
            path: path.into(),
            table: TicketTable::new(),
        };
        let outcome = store.load();
        match &outcome {
            Ok(outcome) => debug!("Opened ticket store {:?}: {:?}", store.path, outcome),
            Err(e) => warn!("Opened ticket store {:?} without a backing file: {}", store.path, e),
        }
        (store, outcome)
    }

    fn persist(&self) -> Result<(), TicketError> {
        workbook::write_tickets(&self.path, self.table.tickets()).map_err(|source| {
            error!("Failed to save tickets to {:?}: {}", self.path, source);
            TicketError::Save {
                path: self.path.clone(),
                source,
            }
        })?;
        debug!("Saved {} tickets to {:?}", self.table.len(), self.path);
        Ok(())
    }
}

impl TicketStore for XlsxTicketStore {
    fn load(&mut self) -> Result<LoadOutcome, TicketError> {
        if !self.path.exists() {
            info!("Ticket file {:?} not found, creating it", self.path);
            self.table = TicketTable::new();
            self.persist()?;
            return Ok(LoadOutcome::Created);
        }

        match workbook::read_tickets(&self.path) {
            Ok(tickets) => {
                let count = tickets.len();
                self.table = TicketTable::from_tickets(tickets);
                debug!("Loaded {} tickets from {:?}", count, self.path);
                Ok(LoadOutcome::Loaded { tickets: count })
            }
            Err(e) => {
                error!(
                    "Failed to load tickets from {:?}, starting with an empty table: {}",
                    self.path, e
                );
                self.table = TicketTable::new();
                Ok(LoadOutcome::Recovered {
                    reason: e.to_string(),
                })
            }
        }
    }

    fn save(&self) -> Result<(), TicketError> {
        self.persist()
    }

    fn add(&mut self, fields: TicketFields) -> Result<Ticket, TicketError> {
        let ticket = self.table.insert(fields);
        info!("Added ticket {}", ticket.number);
        self.persist()?;
        Ok(ticket)
    }

    fn update(
        &mut self,
        number: u64,
        fields: TicketFields,
    ) -> Result<Option<Ticket>, TicketError> {
        let Some(ticket) = self.table.update(number, fields) else {
            warn!("Cannot update ticket {}: not found", number);
            return Ok(None);
        };
        info!("Updated ticket {}", number);
        self.persist()?;
        Ok(Some(ticket))
    }

    fn delete(&mut self, number: u64) -> Result<Vec<Ticket>, TicketError> {
        let removed = self.table.remove(number);
        if removed.is_empty() {
            warn!("Cannot delete ticket {}: not found", number);
            return Ok(removed);
        }
        info!("Deleted ticket {} ({} rows)", number, removed.len());
        self.persist()?;
        Ok(removed)
    }

    fn query(&self, filter: &TicketFilter) -> Vec<Ticket> {
        self.table.filter(filter)
    }

    fn get(&self, number: u64) -> Option<&Ticket> {
        self.table.get(number)
    }

    fn tickets(&self) -> &[Ticket] {
        self.table.tickets()
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        fs::metadata(&self.path)
            .and_then(|metadata| metadata.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }
}
