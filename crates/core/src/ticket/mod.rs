//! Ticket table persisted in a spreadsheet file.

mod filter;
mod store;
mod table;
mod types;
pub mod workbook;
mod xlsx_store;

pub use filter::TicketFilter;
pub use store::{LoadOutcome, TicketError, TicketStore};
pub use table::TicketTable;
pub use types::{Column, Ticket, TicketFields, TicketNumber};
pub use workbook::WorkbookError;
pub use xlsx_store::XlsxTicketStore;
