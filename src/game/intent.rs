//! Player intents and the caller-side rules around them
//!
//! The engine itself accepts any zone and moves one card at a time. A front-end needs
//! two more things, which live here: a zone policy (no dropping cards into the
//! opponent's zones) and linked movement (cards attached to a permanent follow it when
//! it is moved around the battlefield).

use crate::config::TableConfig;
use crate::core::{InstanceId, Position};
use crate::game::{Tabletop, VerbosityLevel};
use crate::zones::Zone;
use crate::{Result, TabletopError};
use serde::{Deserialize, Serialize};

/// Everything a player can ask the table to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveCard {
        card: InstanceId,
        zone: Zone,
        position: Option<Position>,
    },
    TapCard(InstanceId),
    Attach {
        child: InstanceId,
        parent: InstanceId,
    },
    Detach(InstanceId),
    /// Pick the card to attach
    StartAttachment(InstanceId),
    /// Pick the card to attach it to
    CompleteAttachment(InstanceId),
    CancelAttachment,
    AdvanceStep,
    SkipToEnd,
    PassToNextTurn,
}

/// Which zones a player may drop cards into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZonePolicy {
    pub allow_opponent_zones: bool,
}

impl ZonePolicy {
    pub fn check(&self, zone: Zone) -> Result<()> {
        if zone.is_opponent() && !self.allow_opponent_zones {
            return Err(TabletopError::IllegalZone(zone));
        }
        Ok(())
    }
}

/// Applies intents to a table on behalf of a front-end
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentDispatcher {
    policy: ZonePolicy,
}

impl IntentDispatcher {
    pub fn new(policy: ZonePolicy) -> Self {
        IntentDispatcher { policy }
    }

    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(ZonePolicy {
            allow_opponent_zones: config.allow_opponent_zones,
        })
    }

    pub fn policy(&self) -> ZonePolicy {
        self.policy
    }

    pub fn dispatch(&self, table: &mut Tabletop, intent: Intent) -> Result<()> {
        match intent {
            Intent::MoveCard {
                card,
                zone,
                position,
            } => self.move_card(table, card, zone, position),
            Intent::TapCard(card) => table.tap_card(card).map(|_| ()),
            Intent::Attach { child, parent } => table.attach(child, parent),
            Intent::Detach(card) => table.detach(card).map(|_| ()),
            Intent::StartAttachment(card) => table.start_attachment_mode(card),
            Intent::CompleteAttachment(target) => table.complete_attachment(target),
            Intent::CancelAttachment => {
                table.cancel_attachment_mode();
                Ok(())
            }
            Intent::AdvanceStep => {
                table.advance_step();
                Ok(())
            }
            Intent::SkipToEnd => {
                table.skip_to_end();
                Ok(())
            }
            Intent::PassToNextTurn => {
                table.pass_to_next_turn();
                Ok(())
            }
        }
    }

    /// Move a card and bring its attachments along when it lands on the battlefield
    ///
    /// Leaving the battlefield needs no follow-up: the engine already detached
    /// everything.
    pub fn move_card(
        &self,
        table: &mut Tabletop,
        card: InstanceId,
        zone: Zone,
        position: Option<Position>,
    ) -> Result<()> {
        if let Err(err) = self.policy.check(zone) {
            table
                .logger
                .event(VerbosityLevel::Minimal, "rejected", format_args!("move: {err}"));
            return Err(err);
        }
        table.move_card(card, zone, position)?;

        if zone == Zone::Battlefield {
            self.follow_parent(table, card)?;
        }
        Ok(())
    }

    fn follow_parent(&self, table: &mut Tabletop, parent: InstanceId) -> Result<()> {
        let parent_card = table.card(parent)?;
        let cell = parent_card.position;
        let children = parent_card.attached_cards.clone();

        for child in children {
            table.move_card(child, Zone::Battlefield, cell)?;
            self.follow_parent(table, child)?;
        }
        Ok(())
    }
}
