use std::error::Error;
use std::fmt::Display;

/// Spec §7 TRANSIENT_NETWORK: a packet failed to decode, or named an
/// unknown message type. Logged and dropped; the connection is retained.
#[derive(Debug)]
pub enum ProtocolError {
    UnexpectedEof,
    InvalidUtf8,
    UnknownMessageType(u8),
    InvalidEnumTag { field: &'static str, tag: u8 },
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::UnexpectedEof => write!(f, "unexpected end of packet"),
            ProtocolError::InvalidUtf8 => write!(f, "string field is not valid UTF-8"),
            ProtocolError::UnknownMessageType(tag) => {
                write!(f, "unknown message type byte {tag}")
            }
            ProtocolError::InvalidEnumTag { field, tag } => {
                write!(f, "invalid tag {tag} for field {field}")
            }
        }
    }
}

impl Error for ProtocolError {}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
