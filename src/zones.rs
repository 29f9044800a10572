//! Table zones (Hand, Battlefield, Lands, Graveyard, Exile and opponent zones)

use crate::{Result, TabletopError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Different zones where cards can sit on the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Hand,
    Battlefield,
    Lands,
    Graveyard,
    Exile,
    OpponentBattlefield,
    OpponentGraveyard,
    OpponentExile,
}

/// How a zone arranges the cards it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneLayout {
    /// Bounded rows×cols grid; every card owns a cell
    Grid,
    /// Auto-flowing row (the hand); cards never carry a position
    Flow,
    /// Cards pile up in arrival order with a visual offset
    Stack,
}

impl Zone {
    /// Every zone, in display order
    pub const ALL: [Zone; 8] = [
        Zone::Hand,
        Zone::Battlefield,
        Zone::Lands,
        Zone::Graveyard,
        Zone::Exile,
        Zone::OpponentBattlefield,
        Zone::OpponentGraveyard,
        Zone::OpponentExile,
    ];

    pub fn layout(&self) -> ZoneLayout {
        match self {
            Zone::Battlefield | Zone::Lands => ZoneLayout::Grid,
            Zone::Hand => ZoneLayout::Flow,
            Zone::Graveyard
            | Zone::Exile
            | Zone::OpponentBattlefield
            | Zone::OpponentGraveyard
            | Zone::OpponentExile => ZoneLayout::Stack,
        }
    }

    /// Does a card in this zone carry a grid position?
    pub fn is_positioned(&self) -> bool {
        self.layout() == ZoneLayout::Grid
    }

    /// Zones controlled by the opponent
    pub fn is_opponent(&self) -> bool {
        matches!(
            self,
            Zone::OpponentBattlefield | Zone::OpponentGraveyard | Zone::OpponentExile
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Hand => "hand",
            Zone::Battlefield => "battlefield",
            Zone::Lands => "lands",
            Zone::Graveyard => "graveyard",
            Zone::Exile => "exile",
            Zone::OpponentBattlefield => "opponent-battlefield",
            Zone::OpponentGraveyard => "opponent-graveyard",
            Zone::OpponentExile => "opponent-exile",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = TabletopError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Zone::ALL
            .iter()
            .copied()
            .find(|zone| zone.as_str() == normalized)
            .ok_or_else(|| TabletopError::UnknownZone(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_layouts() {
        assert_eq!(Zone::Battlefield.layout(), ZoneLayout::Grid);
        assert_eq!(Zone::Lands.layout(), ZoneLayout::Grid);
        assert_eq!(Zone::Hand.layout(), ZoneLayout::Flow);
        assert_eq!(Zone::Graveyard.layout(), ZoneLayout::Stack);
        assert_eq!(Zone::OpponentBattlefield.layout(), ZoneLayout::Stack);

        assert!(Zone::Battlefield.is_positioned());
        assert!(!Zone::Hand.is_positioned());
    }

    #[test]
    fn test_opponent_zones() {
        let opponent: Vec<_> = Zone::ALL.iter().filter(|z| z.is_opponent()).collect();
        assert_eq!(opponent.len(), 3);
        assert!(!Zone::Battlefield.is_opponent());
    }

    #[test]
    fn test_zone_parsing() {
        assert_eq!("battlefield".parse::<Zone>().unwrap(), Zone::Battlefield);
        assert_eq!("Opponent_Graveyard".parse::<Zone>().unwrap(), Zone::OpponentGraveyard);
        assert!(matches!(
            "library".parse::<Zone>(),
            Err(TabletopError::UnknownZone(_))
        ));

        for zone in Zone::ALL {
            assert_eq!(zone.to_string().parse::<Zone>().unwrap(), zone);
        }
    }
}
