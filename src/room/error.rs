use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum RoomError {
    NotFound(u32),
    Full(u32),
    GameAlreadyInProgress(u32),
    AlreadyInRoom(u32, u64),
    NotHost(u32, u64),
    Empty(u32),
}

impl Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomError::NotFound(id) => write!(f, "room {id} does not exist"),
            RoomError::Full(id) => write!(f, "room {id} is full"),
            RoomError::GameAlreadyInProgress(id) => write!(f, "room {id} game already in progress"),
            RoomError::AlreadyInRoom(id, player) => write!(f, "player {player} already in room {id}"),
            RoomError::NotHost(id, player) => write!(f, "player {player} is not host of room {id}"),
            RoomError::Empty(id) => write!(f, "room {id} has no players"),
        }
    }
}

impl Error for RoomError {}

pub type RoomResult<T> = Result<T, RoomError>;
