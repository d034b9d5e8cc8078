use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum TransportError {
    Closed,
    Io(String),
    HandshakeFailure(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Closed => write!(f, "transport closed"),
            TransportError::Io(message) => write!(f, "transport io error: {message}"),
            TransportError::HandshakeFailure(message) => {
                write!(f, "transport handshake failed: {message}")
            }
        }
    }
}

impl Error for TransportError {}

pub type TransportResult<T> = Result<T, TransportError>;
