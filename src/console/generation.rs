//! Request generations: stale-response suppression per request slot.
//!
//! Starting a request in a slot gives it a fresh generation and stamps the
//! ticket with it. An outcome is applied only while its ticket still carries
//! the newest generation for the slot. Generations come from one counter and
//! are never reused, so a slot can be forgotten once its newest outcome lands.

use std::collections::HashMap;

use crate::api::UploadKind;

/// Independent request slot. A newer request only supersedes older ones in
/// the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Full list load
    List,
    /// Loading an item into the form for editing
    EditLoad,
    /// Deleting one item
    Delete(String),
    /// Create/update submission
    KnowledgeForm,
    /// One of the bulk upload forms
    Upload(UploadKind),
}

/// Stamp carried by an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub slot: Slot,
    pub generation: u64,
}

/// Newest generation per slot with a request in flight.
#[derive(Debug, Default)]
pub struct Generations {
    current: HashMap<Slot, u64>,
    issued: u64,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request in `slot`, superseding any in flight.
    pub fn begin(&mut self, slot: Slot) -> Ticket {
        self.issued += 1;
        self.current.insert(slot.clone(), self.issued);
        Ticket {
            slot,
            generation: self.issued,
        }
    }

    /// Mark the outcome of `ticket` as applied.
    ///
    /// Returns false (and changes nothing) for a stale ticket. Otherwise the
    /// slot is dropped, so it holds no entry until its next request.
    pub fn finish(&mut self, ticket: &Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.current.remove(&ticket.slot);
        true
    }

    /// Number of slots with a request in flight.
    pub fn in_flight(&self) -> usize {
        self.current.len()
    }

    /// Whether `ticket` is still the newest request of its slot.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.current.get(&ticket.slot) == Some(&ticket.generation)
    }

    /// Generation of the request in flight for `slot` (0 if none).
    pub fn latest(&self, slot: &Slot) -> u64 {
        self.current.get(slot).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_increase() {
        let mut generations = Generations::new();
        assert_eq!(generations.begin(Slot::List).generation, 1);
        assert_eq!(generations.begin(Slot::List).generation, 2);
        assert_eq!(generations.begin(Slot::KnowledgeForm).generation, 3);
        assert_eq!(generations.latest(&Slot::List), 2);
        assert_eq!(generations.latest(&Slot::EditLoad), 0);
    }

    #[test]
    fn test_finish_forgets_slot() {
        let mut generations = Generations::new();
        let ticket = generations.begin(Slot::Delete("a".to_string()));
        assert!(generations.finish(&ticket));
        assert_eq!(generations.in_flight(), 0);
        assert!(!generations.is_current(&ticket));
    }

    #[test]
    fn test_finish_ignores_stale_ticket() {
        let mut generations = Generations::new();
        let first = generations.begin(Slot::List);
        let second = generations.begin(Slot::List);
        assert!(!generations.finish(&first));
        assert!(generations.is_current(&second));
    }

    #[test]
    fn test_stale_ticket_never_matches_after_restart() {
        let mut generations = Generations::new();
        let slot = Slot::Delete("a".to_string());
        let old = generations.begin(slot.clone());
        let newer = generations.begin(slot.clone());
        assert!(generations.finish(&newer));

        let restarted = generations.begin(slot);
        assert!(!generations.is_current(&old));
        assert!(generations.is_current(&restarted));
    }

    #[test]
    fn test_older_ticket_is_stale() {
        let mut generations = Generations::new();
        let first = generations.begin(Slot::Upload(UploadKind::Csv));
        let second = generations.begin(Slot::Upload(UploadKind::Csv));
        assert!(!generations.is_current(&first));
        assert!(generations.is_current(&second));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut generations = Generations::new();
        let csv = generations.begin(Slot::Upload(UploadKind::Csv));
        generations.begin(Slot::Upload(UploadKind::Json));
        generations.begin(Slot::Delete("a".to_string()));
        let delete_b = generations.begin(Slot::Delete("b".to_string()));
        assert!(generations.is_current(&csv));
        assert!(generations.is_current(&delete_b));
    }

    #[test]
    fn test_unknown_ticket_is_not_current() {
        let generations = Generations::new();
        let ticket = Ticket {
            slot: Slot::List,
            generation: 1,
        };
        assert!(!generations.is_current(&ticket));
    }
}
