//! Ticket form validation.
//!
//! Plays the part of the new/edit ticket dialogs: it fills in the choice
//! fields the way a combo box would and refuses to submit empty required
//! fields. The store never sees invalid input.

use thiserror::Error;

use ticketdesk_core::{Column, Config, Ticket, TicketFields};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// A required text field is empty.
    #[error("{0} is required")]
    Required(Column),

    /// A choice field holds a value outside the configured list.
    #[error("'{value}' is not a valid {column}, expected one of: {allowed}")]
    NotAChoice {
        column: Column,
        value: String,
        allowed: String,
    },
}

/// Raw field values as typed by the user. `None` means "not provided".
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub name: Option<String>,
    pub program: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

pub struct TicketForm<'a> {
    config: &'a Config,
}

impl<'a> TicketForm<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Validate input for a new ticket. Omitted choices default to the first
    /// configured entry.
    pub fn submit_new(&self, input: FormInput) -> Result<TicketFields, FormError> {
        Ok(TicketFields {
            name: required(Column::Name, input.name)?,
            program: self.choice(Column::Program, input.program, None)?,
            description: required(Column::Description, input.description)?,
            status: self.choice(Column::Status, input.status, None)?,
            priority: self.choice(Column::Priority, input.priority, None)?,
        })
    }

    /// Validate input for an edit of `current`. Omitted fields keep their
    /// current value, except a choice that is no longer configured, which
    /// falls back to the first configured entry.
    pub fn submit_edit(&self, current: &Ticket, input: FormInput) -> Result<TicketFields, FormError> {
        Ok(TicketFields {
            name: required(Column::Name, input.name.or_else(|| Some(current.name.clone())))?,
            program: self.choice(Column::Program, input.program, Some(&current.program))?,
            description: required(
                Column::Description,
                input.description.or_else(|| Some(current.description.clone())),
            )?,
            status: self.choice(Column::Status, input.status, Some(&current.status))?,
            priority: self.choice(Column::Priority, input.priority, Some(&current.priority))?,
        })
    }

    fn choice(
        &self,
        column: Column,
        value: Option<String>,
        current: Option<&str>,
    ) -> Result<String, FormError> {
        let allowed = self.config.choices(column).unwrap_or_default();

        let Some(value) = value else {
            // Same as a combo box: keep the current entry when it is still
            // listed, otherwise select the first one.
            return Ok(match current {
                Some(current) if allowed.is_empty() || allowed.iter().any(|c| c == current) => {
                    current.to_string()
                }
                _ => allowed.first().cloned().unwrap_or_default(),
            });
        };

        if allowed.is_empty() {
            return Ok(value.trim().to_string());
        }

        let wanted = value.trim().to_lowercase();
        allowed
            .iter()
            .find(|choice| choice.to_lowercase() == wanted)
            .cloned()
            .ok_or_else(|| FormError::NotAChoice {
                column,
                value,
                allowed: allowed.join(", "),
            })
    }
}

fn required(column: Column, value: Option<String>) -> Result<String, FormError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FormError::Required(column)),
    }
}
