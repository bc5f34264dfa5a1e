// Identifier generation for new cards and transactions

/// Source of fresh record ids
pub trait IdGenerator {
    fn next_id(&mut self) -> String;

    /// Called after a collection is loaded so the generator can avoid handing
    /// out ids that already exist. Random generators ignore it.
    fn observe_existing(&mut self, _ids: &[&str]) {}
}

/// Random v4 UUIDs. Unique across reloads and restarts.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Process-local counter starting at `0`: "0", "1", "2", ...
///
/// Only unique across restarts if the previously stored ids are fed back
/// through `observe_existing`. Once the counter passes `u64::MAX` it falls
/// back to UUIDs.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
    exhausted: bool,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next: u64) -> Self {
        SequentialIds {
            next,
            exhausted: false,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        if self.exhausted {
            return UuidIds.next_id();
        }
        let id = self.next.to_string();
        match self.next.checked_add(1) {
            Some(next) => self.next = next,
            None => self.exhausted = true,
        }
        id
    }

    fn observe_existing(&mut self, ids: &[&str]) {
        let highest = ids.iter().filter_map(|id| id.parse::<u64>().ok()).max();
        if let Some(highest) = highest {
            match highest.checked_add(1) {
                Some(next) => self.next = self.next.max(next),
                None => {
                    log::warn!("Stored id {} leaves no room for sequential ids, using UUIDs", highest);
                    self.exhausted = true;
                }
            }
        }
    }
}
