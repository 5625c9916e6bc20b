//! In-memory ticket table.

use tracing::warn;

use super::{Ticket, TicketFields, TicketFilter, TicketNumber};

/// Ordered collection of tickets mirroring the backing file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketTable {
    tickets: Vec<Ticket>,
}

impl TicketTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tickets(tickets: Vec<Ticket>) -> Self {
        Self { tickets }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Highest ticket number, or `None` if there is none or any number cell is
    /// malformed. Blank number cells are skipped.
    pub fn max_number(&self) -> Option<u64> {
        let mut max: Option<u64> = None;
        for ticket in &self.tickets {
            match ticket.number {
                TicketNumber::Assigned(n) => max = Some(max.map_or(n, |m| m.max(n))),
                TicketNumber::Blank => {}
                TicketNumber::Malformed(_) => return None,
            }
        }
        max
    }

    /// Number for the next ticket: `max + 1`, falling back to `1`.
    ///
    /// The fallback can collide with an existing number when the table holds
    /// malformed numbers.
    pub fn next_number(&self) -> u64 {
        match self.max_number().and_then(|max| max.checked_add(1)) {
            Some(next) => next,
            None => {
                if self.tickets.iter().any(|ticket| ticket.number.is_malformed()) {
                    warn!(
                        "Cannot determine the highest ticket number among {} tickets, falling back to 1",
                        self.len()
                    );
                }
                1
            }
        }
    }

    /// Append a ticket numbered with [`TicketTable::next_number`].
    pub fn insert(&mut self, fields: TicketFields) -> Ticket {
        let ticket = Ticket::new(self.next_number(), fields);
        self.tickets.push(ticket.clone());
        ticket
    }

    pub fn get(&self, number: u64) -> Option<&Ticket> {
        self.tickets.iter().find(|ticket| ticket.number.is(number))
    }

    /// Overwrite the mutable fields of every ticket with `number`.
    ///
    /// Returns the first updated ticket, or `None` if no ticket matched.
    pub fn update(&mut self, number: u64, fields: TicketFields) -> Option<Ticket> {
        let mut updated = None;
        for ticket in self
            .tickets
            .iter_mut()
            .filter(|ticket| ticket.number.is(number))
        {
            ticket.apply(fields.clone());
            if updated.is_none() {
                updated = Some(ticket.clone());
            }
        }
        updated
    }

    /// Remove every ticket with `number`, keeping the order of the rest.
    pub fn remove(&mut self, number: u64) -> Vec<Ticket> {
        let (removed, kept): (Vec<Ticket>, Vec<Ticket>) = std::mem::take(&mut self.tickets)
            .into_iter()
            .partition(|ticket| ticket.number.is(number));
        self.tickets = kept;
        removed
    }

    /// Tickets matching `filter`, in table order.
    pub fn filter(&self, filter: &TicketFilter) -> Vec<Ticket> {
        self.tickets
            .iter()
            .filter(|ticket| filter.matches(ticket))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::Column;

    fn fields(name: &str, status: &str) -> TicketFields {
        TicketFields::new(name, "ProgA", "desc", status, "P1")
    }

    fn malformed(raw: &str) -> Ticket {
        Ticket {
            number: TicketNumber::Malformed(raw.to_string()),
            ..Ticket::new(1, fields("corrupt", "Ouvert"))
        }
    }

    #[test]
    fn test_next_number_on_empty_table() {
        let table = TicketTable::new();
        assert_eq!(table.max_number(), None);
        assert_eq!(table.next_number(), 1);
    }

    #[test]
    fn test_insert_numbers_increase() {
        let mut table = TicketTable::new();
        let numbers: Vec<u64> = (0..5)
            .map(|i| table.insert(fields(&format!("t{}", i), "Ouvert")))
            .filter_map(|t| t.number.value())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_next_number_follows_max_not_count() {
        let table = TicketTable::from_tickets(vec![
            Ticket::new(7, fields("a", "Ouvert")),
            Ticket::new(3, fields("b", "Ouvert")),
        ]);
        assert_eq!(table.next_number(), 8);
    }

    #[test]
    fn test_next_number_falls_back_on_malformed_number() {
        let table = TicketTable::from_tickets(vec![
            Ticket::new(7, fields("a", "Ouvert")),
            malformed("abc"),
        ]);
        assert_eq!(table.max_number(), None);
        assert_eq!(table.next_number(), 1);
    }

    #[test]
    fn test_next_number_skips_blank_numbers() {
        let blank = Ticket {
            number: TicketNumber::Blank,
            ..Ticket::new(1, fields("no number", "Ouvert"))
        };
        let table = TicketTable::from_tickets(vec![
            Ticket::new(1, fields("a", "Ouvert")),
            blank.clone(),
            Ticket::new(2, fields("b", "Ouvert")),
        ]);
        assert_eq!(table.max_number(), Some(2));
        assert_eq!(table.next_number(), 3);

        let only_blank = TicketTable::from_tickets(vec![blank]);
        assert_eq!(only_blank.max_number(), None);
        assert_eq!(only_blank.next_number(), 1);
    }

    #[test]
    fn test_update_only_touches_target() {
        let mut table = TicketTable::new();
        table.insert(fields("Alice", "Ouvert"));
        table.insert(fields("Bob", "Ouvert"));

        let updated = table.update(2, fields("Robert", "Fermé")).unwrap();
        assert_eq!(updated.number, TicketNumber::Assigned(2));
        assert_eq!(updated.name, "Robert");
        assert_eq!(table.get(1).unwrap().name, "Alice");
        assert_eq!(table.get(2).unwrap().status, "Fermé");
    }

    #[test]
    fn test_update_missing_number_leaves_table_unchanged() {
        let mut table = TicketTable::new();
        table.insert(fields("Alice", "Ouvert"));
        let before = table.clone();

        assert!(table.update(42, fields("Nobody", "Fermé")).is_none());
        assert_eq!(table, before);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut table = TicketTable::new();
        for name in ["a", "b", "c", "d"] {
            table.insert(fields(name, "Ouvert"));
        }

        let removed = table.remove(2);
        assert_eq!(removed.len(), 1);
        let names: Vec<&str> = table.tickets().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "d"]);

        assert!(table.remove(2).is_empty());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_remove_all_duplicates() {
        let mut table = TicketTable::from_tickets(vec![
            Ticket::new(1, fields("a", "Ouvert")),
            Ticket::new(2, fields("b", "Ouvert")),
            Ticket::new(1, fields("c", "Ouvert")),
        ]);
        let removed = table.remove(1);
        assert_eq!(removed.len(), 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.tickets()[0].name, "b");
    }

    #[test]
    fn test_filter_preserves_order() {
        let mut table = TicketTable::new();
        table.insert(fields("a", "Ouvert"));
        table.insert(fields("b", "Fermé"));
        table.insert(fields("c", "ouvert"));

        let filter = TicketFilter::new().with(Column::Status, "OUVERT");
        let names: Vec<String> = table.filter(&filter).into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a", "c"]);

        assert_eq!(table.filter(&TicketFilter::new()).len(), 3);
    }
}
