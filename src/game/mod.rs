pub mod error;
pub mod logic;
pub mod rng;
pub mod rules;
pub mod systems;
pub mod wave;

pub use error::{GameLogicError, GameLogicResult};
pub use logic::{GameLogic, TickReport};
pub use rules::{GameRuleKey, GameRules, FIXED_TIMESTEP};
