//! Tabletop - state engine for a virtual card-game table
//!
//! Tracks card instances across zones, grid placement on the battlefield and lands
//! rows, attachments between permanents, tapped state and the turn-phase clock.
//! Front-ends send intents and read back [`game::TableView`] snapshots.

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod script;
pub mod zones;

pub use error::{Result, TabletopError};
