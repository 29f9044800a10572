//! Core table types: instance IDs, catalog metadata and card instances

pub mod card;
pub mod entity;

pub use card::{CardInstance, CardMeta, CardType, Color, Position};
pub use entity::InstanceId;
