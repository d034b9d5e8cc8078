pub mod components;
pub mod entity;
pub mod registry;

pub use components::*;
pub use entity::EntityId;
pub use registry::{Component, Registry};
