//! Card instance identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple integer ID for a card instance on the table
///
/// IDs are handed out contiguously by the registry at setup and stay stable for the
/// whole session: instances are never deallocated or recycled. Two copies of the same
/// catalog card get two different instance IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(u32);

impl InstanceId {
    pub fn new(id: u32) -> Self {
        InstanceId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
