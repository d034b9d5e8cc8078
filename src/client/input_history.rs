//! Bounded history of recently sent inputs. Serves two purposes (spec
//! §4.5/§4.7): it is the redundant batch attached to every outgoing
//! `C2S_PLAYER_INPUT` packet (so a single dropped packet does not lose an
//! input), and it is what gets replayed against a freshly reconciled
//! position once the server acknowledges a sequence number.

use std::collections::VecDeque;

use crate::protocol::{ActionTag, InputSnapshot};

/// ~200ms at 60Hz (spec §4.5 "redundant input batches").
pub const DEFAULT_CAPACITY: usize = 12;

pub struct InputHistory {
    entries: VecDeque<InputSnapshot>,
    capacity: usize,
}

impl InputHistory {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity: capacity.max(1) }
    }

    pub fn push(&mut self, seq: u32, dx: i8, dy: i8, shoot: bool) {
        let mut actions = Vec::new();
        if dy < 0 {
            actions.push(ActionTag::Up);
        }
        if dy > 0 {
            actions.push(ActionTag::Down);
        }
        if dx < 0 {
            actions.push(ActionTag::Left);
        }
        if dx > 0 {
            actions.push(ActionTag::Right);
        }
        if shoot {
            actions.push(ActionTag::Shoot);
        }
        self.entries.push_back(InputSnapshot { seq, actions });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Every input still held, oldest first: what goes out on the wire
    /// as the redundant batch for this tick.
    pub fn batch(&self) -> Vec<InputSnapshot> {
        self.entries.iter().cloned().collect()
    }

    /// Drops every entry the server has confirmed processing (spec §4.5
    /// `last_processed_input_seq`), leaving only what still needs replay.
    pub fn acknowledge(&mut self, last_processed_seq: u32) {
        self.entries.retain(|entry| entry.seq > last_processed_seq);
    }

    pub fn unacked(&self) -> impl Iterator<Item = &InputSnapshot> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_evicts_beyond_capacity() {
        let mut history = InputHistory::new(3);
        for seq in 1..=5 {
            history.push(seq, 1, 0, false);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.batch().first().unwrap().seq, 3);
    }

    #[test]
    fn acknowledge_drops_confirmed_entries() {
        let mut history = InputHistory::new(12);
        for seq in 1..=5 {
            history.push(seq, 1, 0, false);
        }
        history.acknowledge(3);
        assert_eq!(history.unacked().map(|s| s.seq).collect::<Vec<_>>(), vec![4, 5]);
    }
}
