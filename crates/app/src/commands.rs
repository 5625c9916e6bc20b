use std::cmp::Ordering;
use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use ticketdesk_core::{
    Column, Config, LoadOutcome, Ticket, TicketError, TicketFilter, TicketNumber, TicketStore,
};

use crate::cli::Commands;
use crate::form::{FormInput, TicketForm};
use crate::view;

#[derive(Serialize)]
struct ListOutput<'a> {
    tickets: &'a [Ticket],
    last_modified: Option<DateTime<Utc>>,
}

/// Run one command against the store, reading answers to prompts from
/// `input` and writing user-facing output to `out`.
pub fn execute(
    command: Commands,
    store: &mut dyn TicketStore,
    config: &Config,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::List {
            filters,
            sort,
            desc,
            json,
        } => {
            let filter = TicketFilter::from_labels(filters)?;
            let sort = sort.map(|column| (column, desc));
            list(&*store, &filter, sort, json, out)
        }
        Commands::Add {
            name,
            description,
            program,
            status,
            priority,
            json,
        } => {
            let input = FormInput {
                name: Some(name),
                program,
                description: Some(description),
                status,
                priority,
            };
            add(store, config, input, json, out)
        }
        Commands::Edit {
            number,
            name,
            description,
            program,
            status,
            priority,
            json,
        } => {
            let input = FormInput {
                name,
                program,
                description,
                status,
                priority,
            };
            edit(store, config, number, input, json, out)
        }
        Commands::Delete { number, yes } => delete(store, number, yes, input, out),
        Commands::Choices => choices(config, out),
    }
}

/// Notice for the user when the initial load did not read the file as is.
pub fn load_notice(outcome: &Result<LoadOutcome, TicketError>) -> Option<String> {
    match outcome {
        Ok(LoadOutcome::Loaded { .. }) => None,
        Ok(LoadOutcome::Created) => None,
        Ok(LoadOutcome::Recovered { reason }) => Some(format!(
            "Warning: the ticket file could not be read ({}); starting with an empty table. \
             The next change will overwrite it.",
            reason
        )),
        Err(e) => {
            let causes: Vec<String> = anyhow::Chain::new(e).map(|c| c.to_string()).collect();
            Some(format!("Warning: {}", causes.join(": ")))
        }
    }
}

pub fn list(
    store: &dyn TicketStore,
    filter: &TicketFilter,
    sort: Option<(Column, bool)>,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let mut tickets = store.query(filter);
    if let Some((column, desc)) = sort {
        sort_tickets(&mut tickets, column, desc);
    }
    debug!(
        "{} of {} tickets match the filter",
        tickets.len(),
        store.tickets().len()
    );

    if json {
        let output = ListOutput {
            tickets: &tickets,
            last_modified: store.last_modified(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    if tickets.is_empty() {
        writeln!(out, "No tickets found.")?;
    } else {
        writeln!(out, "{}", view::ticket_table(&tickets))?;
    }
    writeln!(out, "{}", view::last_modified(store.last_modified()))?;
    Ok(())
}

pub fn add(
    store: &mut dyn TicketStore,
    config: &Config,
    input: FormInput,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let fields = TicketForm::new(config).submit_new(input)?;
    let ticket = store.add(fields).map_err(|e| not_durable(e, "created"))?;
    report(&ticket, "Created", json, out)
}

pub fn edit(
    store: &mut dyn TicketStore,
    config: &Config,
    number: u64,
    input: FormInput,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(current) = store.get(number).cloned() else {
        bail!("Ticket {} not found", number);
    };
    let fields = TicketForm::new(config).submit_edit(&current, input)?;
    let Some(ticket) = store
        .update(number, fields)
        .map_err(|e| not_durable(e, "updated"))?
    else {
        bail!("Ticket {} not found", number);
    };
    report(&ticket, "Updated", json, out)
}

pub fn delete(
    store: &mut dyn TicketStore,
    number: u64,
    yes: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(name) = store.get(number).map(|ticket| ticket.name.clone()) else {
        bail!("Ticket {} not found", number);
    };
    if !yes && !confirm(&format!("Delete ticket {} ({})", number, name), input, out)? {
        writeln!(out, "Deletion cancelled")?;
        return Ok(());
    }

    let removed = store
        .delete(number)
        .map_err(|e| not_durable(e, "deleted"))?;
    if removed.is_empty() {
        bail!("Ticket {} not found", number);
    }
    writeln!(out, "Deleted ticket {}", number)?;
    Ok(())
}

pub fn choices(config: &Config, out: &mut dyn Write) -> Result<()> {
    for column in [Column::Program, Column::Status, Column::Priority] {
        let choices = config.choices(column).unwrap_or_default();
        if choices.is_empty() {
            writeln!(out, "{}: (any)", column)?;
        } else {
            writeln!(out, "{}: {}", column, choices.join(", "))?;
        }
    }
    Ok(())
}

/// Ask a yes/no question; anything but an explicit yes declines.
fn confirm(prompt: &str, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<bool> {
    write!(out, "{}? [y/N] ", prompt)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "o" | "oui"
    ))
}

/// Stable sort on one column. Numbers compare numerically with blank or
/// malformed ones last; text compares case-insensitively.
fn sort_tickets(tickets: &mut [Ticket], column: Column, desc: bool) {
    tickets.sort_by(|a, b| {
        let ordering = match column {
            Column::Number => compare_numbers(&a.number, &b.number),
            _ => a
                .value(column)
                .to_lowercase()
                .cmp(&b.value(column).to_lowercase()),
        };
        if desc {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_numbers(a: &TicketNumber, b: &TicketNumber) -> Ordering {
    match (a.value(), b.value()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn not_durable(e: TicketError, action: &str) -> anyhow::Error {
    if e.is_save_failure() {
        anyhow::Error::new(e).context(format!(
            "Ticket was {} but could not be saved; the change is lost when ticketdesk exits",
            action
        ))
    } else {
        e.into()
    }
}

fn report(ticket: &Ticket, verb: &str, json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(ticket)?)?;
    } else {
        writeln!(out, "{} ticket {}", verb, ticket.number)?;
    }
    Ok(())
}
