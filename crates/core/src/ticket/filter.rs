//! Column filters over the ticket table.

use std::collections::BTreeMap;

use super::{Column, Ticket, TicketError};

/// Per-column substring filter.
///
/// Patterns are trimmed and matched case-insensitively against the string form
/// of the column value. Every non-empty pattern must match (AND); an empty
/// filter matches every ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    patterns: BTreeMap<Column, String>,
}

impl TicketFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter `column` by `pattern`. An empty (or blank) pattern clears the
    /// column's filter.
    pub fn with(mut self, column: Column, pattern: impl AsRef<str>) -> Self {
        let pattern = pattern.as_ref().trim().to_lowercase();
        if pattern.is_empty() {
            self.patterns.remove(&column);
        } else {
            self.patterns.insert(column, pattern);
        }
        self
    }

    /// Like [`TicketFilter::with`], with the column given by header label or
    /// key (`"Statut"`, `"status"`).
    pub fn with_label(self, label: &str, pattern: impl AsRef<str>) -> Result<Self, TicketError> {
        let column =
            Column::from_label(label).ok_or_else(|| TicketError::UnknownColumn(label.to_string()))?;
        Ok(self.with(column, pattern))
    }

    /// Build a filter from `(label, pattern)` pairs.
    pub fn from_labels<I, K, V>(pairs: I) -> Result<Self, TicketError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |filter, (label, pattern)| {
                filter.with_label(label.as_ref(), pattern)
            })
    }

    /// True if no column is filtered.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.patterns
            .iter()
            .all(|(column, pattern)| ticket.value(*column).to_lowercase().contains(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::TicketFields;

    fn ticket(number: u64, program: &str, status: &str) -> Ticket {
        Ticket::new(
            number,
            TicketFields::new("name", program, "description", status, "P1"),
        )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = TicketFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&ticket(1, "x", "Ouvert")));
    }

    #[test]
    fn test_blank_pattern_is_ignored() {
        let filter = TicketFilter::new().with(Column::Status, "   ");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let filter = TicketFilter::new().with(Column::Status, "OUV");
        assert_eq!(filter, TicketFilter::new().with(Column::Status, " ouv "));
        assert!(filter.matches(&ticket(1, "x", "Ouvert")));
        assert!(!filter.matches(&ticket(2, "x", "Fermé")));
    }

    #[test]
    fn test_number_column_matches_string_form() {
        let filter = TicketFilter::new().with(Column::Number, "1");
        assert!(filter.matches(&ticket(1, "x", "Ouvert")));
        assert!(filter.matches(&ticket(12, "x", "Ouvert")));
        assert!(!filter.matches(&ticket(2, "x", "Ouvert")));
    }

    #[test]
    fn test_filters_are_combined_with_and() {
        let filter = TicketFilter::from_labels([("Programme", "x"), ("Statut", "ouvert")]).unwrap();
        assert!(filter.matches(&ticket(1, "x", "Ouvert")));
        assert!(!filter.matches(&ticket(2, "y", "Ouvert")));
        assert!(!filter.matches(&ticket(3, "x", "Fermé")));
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let result = TicketFilter::from_labels([("Owner", "bob")]);
        assert!(matches!(result, Err(TicketError::UnknownColumn(label)) if label == "Owner"));
    }

    #[test]
    fn test_accented_pattern_matches() {
        let filter = TicketFilter::new().with(Column::Status, "FERMÉ");
        assert!(filter.matches(&ticket(1, "x", "Fermé")));
    }
}
