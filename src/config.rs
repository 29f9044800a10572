//! Table configuration: grid sizes, logging verbosity and zone policy

use crate::game::VerbosityLevel;
use crate::zones::Zone;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Size of a positioned zone's grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: u8,
    pub cols: u8,
}

impl GridSize {
    pub fn new(rows: u8, cols: u8) -> Self {
        GridSize { rows, cols }
    }

    pub fn cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

/// Settings for a tabletop session
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```json
/// { "battlefield": { "rows": 3, "cols": 8 }, "verbosity": "Verbose" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Battlefield grid (default 2×10)
    pub battlefield: GridSize,

    /// Lands grid (default 1×10)
    pub lands: GridSize,

    /// Logger verbosity
    pub verbosity: VerbosityLevel,

    /// Let intents drop cards into opponent zones
    pub allow_opponent_zones: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            battlefield: GridSize::new(2, 10),
            lands: GridSize::new(1, 10),
            verbosity: VerbosityLevel::default(),
            allow_opponent_zones: false,
        }
    }
}

impl TableConfig {
    /// Grid for a positioned zone, `None` for hand and stacking zones
    pub fn grid(&self, zone: Zone) -> Option<GridSize> {
        match zone {
            Zone::Battlefield => Some(self.battlefield),
            Zone::Lands => Some(self.lands),
            _ => None,
        }
    }

    /// Load a config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grids() {
        let config = TableConfig::default();
        assert_eq!(config.grid(Zone::Battlefield), Some(GridSize::new(2, 10)));
        assert_eq!(config.grid(Zone::Lands), Some(GridSize::new(1, 10)));
        assert_eq!(config.grid(Zone::Hand), None);
        assert_eq!(config.grid(Zone::Graveyard), None);
        assert_eq!(config.battlefield.cells(), 20);
    }

    #[test]
    fn test_partial_json_config() {
        let config = TableConfig::from_json(r#"{ "lands": { "rows": 2, "cols": 4 } }"#).unwrap();
        assert_eq!(config.lands, GridSize::new(2, 4));
        assert_eq!(config.battlefield, GridSize::new(2, 10));
        assert!(!config.allow_opponent_zones);
    }

    #[test]
    fn test_invalid_json_config() {
        assert!(TableConfig::from_json("{ not json").is_err());
    }
}
