//! Pluggable matchmaking policy (spec §5 Open Question, resolved in
//! SPEC_FULL.md): what `RoomManager` does with a player who asks to be
//! matched rather than naming a room. `FifoPolicy` is the minimum
//! built-in: first room with WAITING state and spare capacity, else a
//! freshly created one.

use super::room::{RoomHandle, RoomState};

pub trait MatchmakingPolicy: Send + Sync {
    /// Picks an existing room to join from the public, joinable set, or
    /// returns `None` to signal the caller should create a new room.
    fn select<'a>(&self, candidates: &'a [RoomHandle]) -> Option<&'a RoomHandle>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FifoPolicy;

impl MatchmakingPolicy for FifoPolicy {
    fn select<'a>(&self, candidates: &'a [RoomHandle]) -> Option<&'a RoomHandle> {
        candidates
            .iter()
            .find(|room| room.state() == RoomState::Waiting && !room.is_full())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_prefers_first_joinable_room() {
        let policy = FifoPolicy;
        let rooms: Vec<RoomHandle> = Vec::new();
        assert!(policy.select(&rooms).is_none());
    }
}
