pub mod ecs;
pub mod game;
pub mod net;
pub mod protocol;
pub mod room;
pub mod session;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "client")]
pub mod client;
