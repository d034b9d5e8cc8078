use std::error::Error;
use std::fmt::Display;

/// Errors a room's simulation can hit while driving `GameLogic`. None of
/// these are expected in normal operation; a panic inside a system is
/// caught by the pipeline itself (spec §4.2) and never surfaces here.
#[derive(Debug)]
pub enum GameLogicError {
    UnknownPlayer(u64),
    PlayerAlreadyPresent(u64),
}

impl Display for GameLogicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameLogicError::UnknownPlayer(id) => write!(f, "no entity for player {id}"),
            GameLogicError::PlayerAlreadyPresent(id) => {
                write!(f, "player {id} already has an entity")
            }
        }
    }
}

impl Error for GameLogicError {}

pub type GameLogicResult<T> = Result<T, GameLogicError>;
