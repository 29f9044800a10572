//! Tabletop state: the owned store behind every table operation

/// Conditional event logging that skips formatting when the feature is disabled
macro_rules! log_if_verbose {
    ($self:expr, $level:ident, $category:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $self
                .logger
                .event(VerbosityLevel::$level, $category, format_args!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$self;
        }
    };
}

use crate::config::TableConfig;
use crate::core::{CardInstance, CardMeta, InstanceId, Position};
use crate::game::attachment::{self, AttachmentMode};
use crate::game::transition::{self, MoveOutcome};
use crate::game::{CardRegistry, TableLogger, TurnPhase, VerbosityLevel};
use crate::zones::Zone;
use crate::{Result, TabletopError};
use std::sync::Arc;

/// Complete table state
///
/// One value holds the card registry, the turn clock, the attachment selection mode,
/// the configuration and the logger. Operations take `&mut self`, so at most one
/// mutation is ever in flight. Each operation is all-or-nothing: when it returns
/// `Err`, the table is exactly as it was before the call.
#[derive(Debug, Clone)]
pub struct Tabletop {
    registry: CardRegistry,
    phase: TurnPhase,
    attachment_mode: AttachmentMode,
    config: TableConfig,

    /// Centralized logger for table events
    pub logger: TableLogger,
}

impl Tabletop {
    pub fn new(config: TableConfig) -> Self {
        Tabletop {
            registry: CardRegistry::new(),
            phase: TurnPhase::new(),
            attachment_mode: AttachmentMode::Idle,
            logger: TableLogger::with_verbosity(config.verbosity),
            config,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    pub fn card(&self, id: InstanceId) -> Result<&CardInstance> {
        self.registry.get(id)
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn attachment_mode(&self) -> AttachmentMode {
        self.attachment_mode
    }

    fn rejected<T>(&self, intent: &str, err: TabletopError) -> Result<T> {
        self.logger
            .event(VerbosityLevel::Minimal, "rejected", format_args!("{intent}: {err}"));
        Err(err)
    }

    fn describe(&self, id: InstanceId) -> String {
        match self.registry.get(id) {
            Ok(card) => format!("{} ({})", card.name(), id),
            Err(_) => id.to_string(),
        }
    }

    /// Put a new card on the table at setup
    ///
    /// Grid zones get the first free cell; a full grid is rejected.
    pub fn add_card(&mut self, meta: impl Into<Arc<CardMeta>>, zone: Zone) -> Result<InstanceId> {
        let meta = meta.into();
        let position = match self.config.grid(zone) {
            Some(grid) => Some(
                crate::game::placement::first_free_cell(
                    zone,
                    grid,
                    self.registry.occupied_cells(zone, &[]),
                )
                .or_else(|err| self.rejected("add card", err))?,
            ),
            None => None,
        };

        let id = self.registry.create(meta, zone, position);
        log_if_verbose!(self, Verbose, "setup", "{} created in {}", self.describe(id), zone);
        Ok(id)
    }

    /// Move a card to `zone`, optionally onto an explicit cell
    pub fn move_card(
        &mut self,
        card_id: InstanceId,
        zone: Zone,
        position: Option<Position>,
    ) -> Result<MoveOutcome> {
        let outcome =
            match transition::move_card(&mut self.registry, &self.config, card_id, zone, position) {
                Ok(outcome) => outcome,
                Err(err) => return self.rejected("move", err),
            };

        for child in &outcome.detached_children {
            log_if_verbose!(self, Normal, "detach", "{} falls off", self.describe(*child));
        }
        if let Some(cell) = outcome.position {
            log_if_verbose!(
                self,
                Normal,
                "move",
                "{}: {} -> {} at {}",
                self.describe(card_id),
                outcome.from,
                outcome.to,
                cell
            );
        } else {
            log_if_verbose!(
                self,
                Normal,
                "move",
                "{}: {} -> {}",
                self.describe(card_id),
                outcome.from,
                outcome.to
            );
        }
        Ok(outcome)
    }

    /// Toggle a card's tapped state, returning the new value
    pub fn tap_card(&mut self, card_id: InstanceId) -> Result<bool> {
        let tapped = match transition::tap_card(&mut self.registry, card_id) {
            Ok(tapped) => tapped,
            Err(err) => return self.rejected("tap", err),
        };
        log_if_verbose!(
            self,
            Normal,
            "tap",
            "{} {}",
            self.describe(card_id),
            if tapped { "tapped" } else { "untapped" }
        );
        Ok(tapped)
    }

    /// Attach `child` to `parent`; success ends any pending attachment selection
    pub fn attach(&mut self, child: InstanceId, parent: InstanceId) -> Result<()> {
        if let Err(err) = attachment::attach(&mut self.registry, child, parent) {
            return self.rejected("attach", err);
        }
        self.attachment_mode = AttachmentMode::Idle;
        log_if_verbose!(
            self,
            Normal,
            "attach",
            "{} attached to {}",
            self.describe(child),
            self.describe(parent)
        );
        Ok(())
    }

    /// Detach a card from its parent; `Ok(false)` when it was not attached
    pub fn detach(&mut self, child: InstanceId) -> Result<bool> {
        let detached = match attachment::detach(&mut self.registry, child) {
            Ok(detached) => detached,
            Err(err) => return self.rejected("detach", err),
        };
        if detached {
            log_if_verbose!(self, Normal, "detach", "{} detached", self.describe(child));
        }
        Ok(detached)
    }

    /// Enter "pick a target" mode with `source` as the card to attach
    pub fn start_attachment_mode(&mut self, source: InstanceId) -> Result<()> {
        if let Err(err) = self.registry.get(source) {
            return self.rejected("select", err);
        }
        self.attachment_mode = AttachmentMode::Selecting(source);
        log_if_verbose!(self, Verbose, "attach", "selecting target for {}", self.describe(source));
        Ok(())
    }

    pub fn cancel_attachment_mode(&mut self) {
        if self.attachment_mode.is_selecting() {
            log_if_verbose!(self, Verbose, "attach", "attachment selection cancelled");
        }
        self.attachment_mode = AttachmentMode::Idle;
    }

    /// Attach the pending source to `target`
    ///
    /// A rejected target keeps the selection open so the user can pick again.
    pub fn complete_attachment(&mut self, target: InstanceId) -> Result<()> {
        match self.attachment_mode.pending_source() {
            Some(source) => self.attach(source, target),
            None => self.rejected("attach", TabletopError::NoAttachmentSource(target)),
        }
    }

    pub fn advance_step(&mut self) -> TurnPhase {
        self.phase.advance_step();
        log_if_verbose!(self, Normal, "phase", "{}", self.phase);
        self.phase
    }

    pub fn skip_to_end(&mut self) -> TurnPhase {
        self.phase.skip_to_end();
        log_if_verbose!(self, Normal, "phase", "skip to {}", self.phase);
        self.phase
    }

    pub fn pass_to_next_turn(&mut self) -> TurnPhase {
        self.phase.pass_to_next_turn();
        log_if_verbose!(self, Normal, "phase", "new turn: {}", self.phase);
        self.phase
    }

    /// Verify the data-model invariants over every card
    ///
    /// - position present exactly in grid zones
    /// - `attached_to` and `attached_cards` mirror each other, without duplicates
    /// - no attachment cycles
    /// - attachment links only between battlefield cards
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(TabletopError::InvariantViolation(msg));

        for card in self.registry.iter() {
            if card.zone.is_positioned() != card.position.is_some() {
                return violation(format!(
                    "{} in {} has position {:?}",
                    card.id, card.zone, card.position
                ));
            }

            if (card.is_attached() || card.has_attachments()) && card.zone != Zone::Battlefield {
                return violation(format!("{} has attachments outside the battlefield", card.id));
            }

            if let Some(parent) = card.attached_to {
                let listed = self
                    .registry
                    .get(parent)
                    .map(|p| p.attached_cards.contains(&card.id))
                    .unwrap_or(false);
                if !listed {
                    return violation(format!("{} is not listed by its parent {}", card.id, parent));
                }
                if attachment::is_descendant(&self.registry, card.id, card.id) {
                    return violation(format!("{} is part of an attachment cycle", card.id));
                }
            }

            for (idx, child) in card.attached_cards.iter().enumerate() {
                if card.attached_cards[..idx].contains(child) {
                    return violation(format!("{} lists {} twice", card.id, child));
                }
                let backlink = self.registry.get(*child).map(|c| c.attached_to).ok().flatten();
                if backlink != Some(card.id) {
                    return violation(format!("{} lists {} without a backlink", card.id, child));
                }
            }
        }
        Ok(())
    }
}

impl Default for Tabletop {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}
