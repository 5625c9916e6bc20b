use chrono::{DateTime, Local, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use ticketdesk_core::Ticket;

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "N°")]
    number: String,
    #[tabled(rename = "Nom")]
    name: String,
    #[tabled(rename = "Programme")]
    program: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Statut")]
    status: String,
    #[tabled(rename = "Priorité")]
    priority: String,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        // Trailing whitespace and newlines only make the table ragged.
        Self {
            number: ticket.number.to_string(),
            name: ticket.name.trim_end().to_string(),
            program: ticket.program.trim_end().to_string(),
            description: ticket.description.trim_end().to_string(),
            status: ticket.status.trim_end().to_string(),
            priority: ticket.priority.trim_end().to_string(),
        }
    }
}

/// Render tickets as a text table.
pub fn ticket_table(tickets: &[Ticket]) -> String {
    let mut table = Table::new(tickets.iter().map(TicketRow::from));
    table.with(Style::modern());
    table.to_string()
}

/// Render the backing file timestamp in local time.
pub fn last_modified(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => format!(
            "Last modified: {}",
            ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => "Last modified: unknown".to_string(),
    }
}
