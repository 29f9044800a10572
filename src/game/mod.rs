//! Table state engine: registry, placement, attachments, transitions and turn phases

pub mod attachment;
pub mod intent;
pub mod logger;
pub mod phase;
pub mod placement;
pub mod registry;
pub mod snapshot;
pub mod state;
pub mod transition;

pub use attachment::AttachmentMode;
pub use intent::{Intent, IntentDispatcher, ZonePolicy};
pub use logger::{LogEntry, OutputFormat, TableLogger, VerbosityLevel};
pub use phase::{Phase, Step, TurnPhase};
pub use registry::CardRegistry;
pub use snapshot::{CardView, TableView, ZoneView};
pub use state::Tabletop;
pub use transition::MoveOutcome;
