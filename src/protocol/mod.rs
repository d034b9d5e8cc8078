//! Length-prefixed, versioned binary wire protocol (spec §4.6/§4.7).

pub mod error;
pub mod messages;
pub mod wire;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    ActionTag, ClientMessage, EntityState, EntityTypeTag, InputSnapshot, LeftRoomReason,
    RoomMember, RoomSummary, ServerMessage, SpriteRect,
};
pub use wire::{Reader, Writer};

/// Bumped whenever a message's field layout changes incompatibly.
pub const PROTOCOL_VERSION: u16 = 1;
