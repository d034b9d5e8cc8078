pub mod entity_cache;
pub mod error;
pub mod input_history;
pub mod prediction;
#[cfg(feature = "ws")]
pub mod replicator;
#[cfg(feature = "ws")]
pub mod game_loop;

pub use entity_cache::EntityCache;
pub use error::{ClientError, ClientResult};
pub use input_history::InputHistory;
pub use prediction::PredictionEngine;
#[cfg(feature = "ws")]
pub use game_loop::GameLoopClient;
#[cfg(feature = "ws")]
pub use replicator::Replicator;
