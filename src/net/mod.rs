pub mod error;
pub mod threadpool;
pub mod transport;
#[cfg(feature = "ws")]
pub mod ws;

pub use error::{TransportError, TransportResult};
pub use threadpool::ThreadPool;
pub use transport::{PeerId, SendFlags, Transport, TransportEvent};
#[cfg(feature = "ws")]
pub use ws::WsTransport;
