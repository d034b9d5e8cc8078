pub mod error;
pub mod manager;
pub mod matchmaking;
pub mod room;

pub use error::{RoomError, RoomResult};
pub use manager::RoomManager;
pub use matchmaking::{FifoPolicy, MatchmakingPolicy};
pub use room::{RoomHandle, RoomState};
