//! Core ticket data types.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Columns
// ============================================================================

/// A column of the ticket table.
///
/// The set and order of columns is fixed. The header labels are the ones
/// written to (and expected in) the first row of the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Number,
    Name,
    Program,
    Description,
    Status,
    Priority,
}

impl Column {
    /// All columns, in file order.
    pub const ALL: [Column; 6] = [
        Column::Number,
        Column::Name,
        Column::Program,
        Column::Description,
        Column::Status,
        Column::Priority,
    ];

    /// Header label used in the backing file.
    pub fn header(self) -> &'static str {
        match self {
            Column::Number => "N°",
            Column::Name => "Nom",
            Column::Program => "Programme",
            Column::Description => "Description",
            Column::Status => "Statut",
            Column::Priority => "Priorité",
        }
    }

    /// Stable snake_case key, handy where the header label is awkward to type.
    pub fn key(self) -> &'static str {
        match self {
            Column::Number => "number",
            Column::Name => "name",
            Column::Program => "program",
            Column::Description => "description",
            Column::Status => "status",
            Column::Priority => "priority",
        }
    }

    /// Resolve a column from its header label or key, ignoring case and
    /// surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|column| column.header().to_lowercase() == wanted || column.key() == wanted)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ============================================================================
// Ticket number
// ============================================================================

/// Number of a ticket as found in the table.
///
/// Numbers assigned by the store are always `Assigned`. A hand-edited file may
/// leave a number cell empty (`Blank`) or put something other than a positive
/// integer in it (`Malformed`, raw text kept). Either way the row survives the
/// next save untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketNumber {
    Assigned(u64),
    Blank,
    Malformed(String),
}

impl TicketNumber {
    /// Parse the text of a number cell.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return TicketNumber::Blank;
        }
        match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => TicketNumber::Assigned(n),
            _ => TicketNumber::Malformed(raw.to_string()),
        }
    }

    /// The numeric value, if the number is well formed.
    pub fn value(&self) -> Option<u64> {
        match self {
            TicketNumber::Assigned(n) => Some(*n),
            TicketNumber::Blank | TicketNumber::Malformed(_) => None,
        }
    }

    pub fn is(&self, number: u64) -> bool {
        self.value() == Some(number)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, TicketNumber::Malformed(_))
    }
}

impl From<u64> for TicketNumber {
    fn from(n: u64) -> Self {
        TicketNumber::Assigned(n)
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketNumber::Assigned(n) => write!(f, "{}", n),
            TicketNumber::Blank => Ok(()),
            TicketNumber::Malformed(raw) => f.write_str(raw),
        }
    }
}

// ============================================================================
// Ticket
// ============================================================================

/// The user-editable fields of a ticket.
///
/// The store takes these verbatim; checking that `name` and `description` are
/// non-empty, and that the choice fields come from the configured lists, is
/// up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketFields {
    pub name: String,
    pub program: String,
    pub description: String,
    pub status: String,
    pub priority: String,
}

impl TicketFields {
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
        priority: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            description: description.into(),
            status: status.into(),
            priority: priority.into(),
        }
    }
}

/// One row of the ticket table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub number: TicketNumber,
    pub name: String,
    pub program: String,
    pub description: String,
    pub status: String,
    pub priority: String,
}

impl Ticket {
    /// Create a ticket with a store-assigned number.
    pub fn new(number: u64, fields: TicketFields) -> Self {
        Self {
            number: TicketNumber::Assigned(number),
            name: fields.name,
            program: fields.program,
            description: fields.description,
            status: fields.status,
            priority: fields.priority,
        }
    }

    /// String form of a column value, as shown in the table and matched by
    /// filters.
    pub fn value(&self, column: Column) -> Cow<'_, str> {
        match column {
            Column::Number => Cow::Owned(self.number.to_string()),
            Column::Name => Cow::Borrowed(&self.name),
            Column::Program => Cow::Borrowed(&self.program),
            Column::Description => Cow::Borrowed(&self.description),
            Column::Status => Cow::Borrowed(&self.status),
            Column::Priority => Cow::Borrowed(&self.priority),
        }
    }

    /// Copy of the mutable fields.
    pub fn fields(&self) -> TicketFields {
        TicketFields {
            name: self.name.clone(),
            program: self.program.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
        }
    }

    /// Overwrite every mutable field, leaving the number alone.
    pub fn apply(&mut self, fields: TicketFields) {
        self.name = fields.name;
        self.program = fields.program;
        self.description = fields.description;
        self.status = fields.status;
        self.priority = fields.priority;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_and_headers() {
        let headers: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
        assert_eq!(
            headers,
            vec!["N°", "Nom", "Programme", "Description", "Statut", "Priorité"]
        );
    }

    #[test]
    fn test_column_from_label() {
        assert_eq!(Column::from_label("Statut"), Some(Column::Status));
        assert_eq!(Column::from_label("  statut "), Some(Column::Status));
        assert_eq!(Column::from_label("PRIORITÉ"), Some(Column::Priority));
        assert_eq!(Column::from_label("priority"), Some(Column::Priority));
        assert_eq!(Column::from_label("n°"), Some(Column::Number));
        assert_eq!(Column::from_label("Owner"), None);
    }

    #[test]
    fn test_ticket_number_parse() {
        assert_eq!(TicketNumber::parse("12"), TicketNumber::Assigned(12));
        assert_eq!(TicketNumber::parse(" 7 "), TicketNumber::Assigned(7));
        assert_eq!(
            TicketNumber::parse("0"),
            TicketNumber::Malformed("0".to_string())
        );
        assert_eq!(
            TicketNumber::parse("abc"),
            TicketNumber::Malformed("abc".to_string())
        );
        assert_eq!(
            TicketNumber::parse("-3"),
            TicketNumber::Malformed("-3".to_string())
        );
        assert_eq!(TicketNumber::parse(""), TicketNumber::Blank);
        assert_eq!(TicketNumber::parse("   "), TicketNumber::Blank);
        assert_eq!(TicketNumber::Blank.to_string(), "");
    }

    #[test]
    fn test_ticket_value_and_apply() {
        let mut ticket = Ticket::new(
            3,
            TicketFields::new("Alice", "ProgA", "desc", "Ouvert", "P1"),
        );
        assert_eq!(ticket.value(Column::Number), "3");
        assert_eq!(ticket.value(Column::Status), "Ouvert");

        ticket.apply(TicketFields::new("Bob", "ProgB", "other", "Fermé", "P2"));
        assert_eq!(ticket.number, TicketNumber::Assigned(3));
        assert_eq!(ticket.name, "Bob");
        assert_eq!(ticket.fields().priority, "P2");
    }

    #[test]
    fn test_ticket_serializes_number_as_plain_value() {
        let ticket = Ticket::new(4, TicketFields::new("a", "b", "c", "d", "e"));
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["number"], 4);
        assert_eq!(json["status"], "d");
    }
}
