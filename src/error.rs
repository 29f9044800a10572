//! Error types for the tabletop engine

use crate::core::InstanceId;
use crate::zones::Zone;
use thiserror::Error;

/// Why an attach request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentRejection {
    /// A card cannot be attached to itself
    SelfAttachment,
    /// The named card is not on the battlefield
    NotOnBattlefield(InstanceId),
    /// The target is already attached (directly or indirectly) to the card
    Cycle,
}

impl std::fmt::Display for AttachmentRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachmentRejection::SelfAttachment => write!(f, "card cannot attach to itself"),
            AttachmentRejection::NotOnBattlefield(id) => {
                write!(f, "card {id} is not on the battlefield")
            }
            AttachmentRejection::Cycle => write!(f, "attachment would create a cycle"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TabletopError {
    #[error("Card not found: {0}")]
    CardNotFound(InstanceId),

    #[error("Cannot attach {child} to {parent}: {reason}")]
    InvalidAttachment {
        child: InstanceId,
        parent: InstanceId,
        reason: AttachmentRejection,
    },

    #[error("Picked {0} as attachment target with no card selected to attach")]
    NoAttachmentSource(InstanceId),

    #[error("No free cell left in {0}")]
    ZoneFull(Zone),

    #[error("Zone {0} is not available to this player")]
    IllegalZone(Zone),

    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl TabletopError {
    /// Errors that mean "the table refused this intent" rather than a broken input or
    /// environment. The table is unchanged after any of them.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TabletopError::CardNotFound(_)
                | TabletopError::InvalidAttachment { .. }
                | TabletopError::NoAttachmentSource(_)
                | TabletopError::ZoneFull(_)
                | TabletopError::IllegalZone(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TabletopError>;
