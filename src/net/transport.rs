//! Abstraction over "a reliable-capable datagram transport" (spec §4.6):
//! something that can hand us discrete messages per peer, tell us when
//! peers connect/disconnect, and carry both RELIABLE and UNSEQUENCED
//! traffic. `ws` is the concrete implementation this crate ships.

use async_channel::Receiver;

use super::error::TransportResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u64);

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Peer({})", self.0)
    }
}

/// Reliability class a given send should use (spec §4.6). Over the
/// concrete WebSocket transport both classes ride the same ordered
/// stream; the flag is still threaded through so a future transport
/// (raw UDP, ENet) can honor it for real.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFlags {
    Reliable,
    Unsequenced,
}

#[derive(Debug)]
pub enum TransportEvent {
    Connected(PeerId),
    Message(PeerId, Vec<u8>),
    Disconnected(PeerId),
}

/// A running transport: accepts peers, delivers their messages over
/// `events()`, and can send back to any connected peer. Round-trip time
/// is measured at the protocol layer (`Ping`/`Pong`, spec §4.7), not
/// here: the transport has no notion of ping/pong semantics and nothing
/// server-side ever originates a ping, so there is no round trip for it
/// to report.
pub trait Transport: Send + Sync {
    fn events(&self) -> Receiver<TransportEvent>;
    fn send(&self, peer: PeerId, flags: SendFlags, bytes: Vec<u8>) -> TransportResult<()>;
    fn disconnect(&self, peer: PeerId);
}
