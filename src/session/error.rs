use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum SessionError {
    UnknownPlayer(u64),
    AlreadyConnected(u64),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::UnknownPlayer(id) => write!(f, "no session for player {id}"),
            SessionError::AlreadyConnected(id) => write!(f, "player {id} is already connected"),
        }
    }
}

impl Error for SessionError {}

pub type SessionResult<T> = Result<T, SessionError>;
