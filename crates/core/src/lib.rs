pub mod config;
pub mod ticket;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ConfigFormat,
};
pub use ticket::{
    Column, LoadOutcome, Ticket, TicketError, TicketFields, TicketFilter, TicketNumber,
    TicketStore, TicketTable, WorkbookError, XlsxTicketStore,
};
