use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum ClientError {
    ConnectionFailure(String),
    NotConnected,
    Protocol(crate::protocol::ProtocolError),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::ConnectionFailure(message) => write!(f, "failed to connect: {message}"),
            ClientError::NotConnected => write!(f, "not connected"),
            ClientError::Protocol(err) => write!(f, "protocol error: {err}"),
        }
    }
}

impl Error for ClientError {}

impl From<crate::protocol::ProtocolError> for ClientError {
    fn from(err: crate::protocol::ProtocolError) -> Self {
        ClientError::Protocol(err)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
