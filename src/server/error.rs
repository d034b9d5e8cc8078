use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum ServerError {
    Transport(crate::net::TransportError),
    Bind(String),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Transport(err) => write!(f, "transport error: {err}"),
            ServerError::Bind(message) => write!(f, "failed to bind: {message}"),
        }
    }
}

impl Error for ServerError {}

impl From<crate::net::TransportError> for ServerError {
    fn from(err: crate::net::TransportError) -> Self {
        ServerError::Transport(err)
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
