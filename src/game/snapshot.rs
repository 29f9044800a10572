//! Read-back view of the table for presentation layers

use crate::core::{CardInstance, InstanceId, Position};
use crate::game::{Tabletop, TurnPhase};
use crate::zones::Zone;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as FmtWrite};

/// One card as the presentation layer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: InstanceId,
    pub name: String,
    pub tapped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<InstanceId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attached_cards: Vec<InstanceId>,
}

impl From<&CardInstance> for CardView {
    fn from(card: &CardInstance) -> Self {
        CardView {
            id: card.id,
            name: card.meta.name.clone(),
            tapped: card.tapped,
            position: card.position,
            attached_to: card.attached_to,
            attached_cards: card.attached_cards.to_vec(),
        }
    }
}

/// Cards of one zone, in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneView {
    pub zone: Zone,
    pub cards: Vec<CardView>,
}

/// Snapshot of the whole table at one moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub phase: TurnPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_source: Option<InstanceId>,
    pub zones: Vec<ZoneView>,
}

impl TableView {
    pub fn capture(table: &Tabletop) -> Self {
        let zones = Zone::ALL
            .iter()
            .map(|&zone| ZoneView {
                zone,
                cards: table
                    .registry()
                    .cards_in_zone(zone)
                    .into_iter()
                    .map(CardView::from)
                    .collect(),
            })
            .collect();

        TableView {
            phase: table.phase(),
            attachment_source: table.attachment_mode().pending_source(),
            zones,
        }
    }

    pub fn zone(&self, zone: Zone) -> Option<&ZoneView> {
        self.zones.iter().find(|z| z.zone == zone)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Phase: {}", self.phase)?;
        if let Some(source) = self.attachment_source {
            writeln!(f, "Selecting attachment target for {source}")?;
        }

        for zone in self.zones.iter().filter(|z| !z.cards.is_empty()) {
            writeln!(f, "{} ({}):", zone.zone, zone.cards.len())?;
            for card in &zone.cards {
                let mut line = format!("  {} {}", card.id, card.name);
                if let Some(cell) = card.position {
                    write!(line, " at {cell}")?;
                }
                if card.tapped {
                    line.push_str(" [tapped]");
                }
                if let Some(parent) = card.attached_to {
                    write!(line, " -> attached to {parent}")?;
                }
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}
