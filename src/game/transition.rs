//! Zone transitions: moving and tapping cards

use crate::config::TableConfig;
use crate::core::{InstanceId, Position};
use crate::game::attachment;
use crate::game::placement;
use crate::game::CardRegistry;
use crate::zones::{Zone, ZoneLayout};
use crate::Result;

/// What a successful move did, for logging and callers that care
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: Zone,
    pub to: Zone,
    pub position: Option<Position>,
    /// Children that lost their attachment because the card left the battlefield
    pub detached_children: Vec<InstanceId>,
    /// Parent the card was removed from, if it was attached
    pub detached_from: Option<InstanceId>,
}

/// Work out the cell a card will occupy in `target`
///
/// Grid zones use the requested cell or the allocator; the flowing hand and the
/// stacking zones never carry a position, whatever the caller asked for. Neither the
/// card nor anything attached to it blocks the allocator.
pub fn resolve_position(
    registry: &CardRegistry,
    config: &TableConfig,
    card_id: InstanceId,
    target: Zone,
    requested: Option<Position>,
) -> Result<Option<Position>> {
    match (target.layout(), config.grid(target)) {
        (ZoneLayout::Grid, Some(grid)) => {
            let mut moving = attachment::descendants(registry, card_id);
            moving.push(card_id);
            let occupied = registry.occupied_cells(target, &moving);
            placement::resolve_cell(target, grid, requested, occupied).map(Some)
        }
        _ => Ok(None),
    }
}

/// Move a card to `target`
///
/// Leaving the battlefield unwinds every attachment link first: children are detached
/// before the card itself changes zone, then the card is removed from its own parent.
/// The card always arrives untapped. All checks (unknown card, full grid) run before
/// the first write, so an error leaves the registry untouched.
pub fn move_card(
    registry: &mut CardRegistry,
    config: &TableConfig,
    card_id: InstanceId,
    target: Zone,
    requested: Option<Position>,
) -> Result<MoveOutcome> {
    let from = registry.get(card_id)?.zone;
    let position = resolve_position(registry, config, card_id, target, requested)?;

    let mut detached_children = Vec::new();
    let mut detached_from = None;
    if target != Zone::Battlefield {
        detached_children = attachment::detach_children(registry, card_id)?;
        detached_from = registry.get(card_id)?.attached_to;
        attachment::detach(registry, card_id)?;
    }

    let mut card = registry.get(card_id)?.clone();
    card.zone = target;
    card.tapped = false;
    card.position = position;
    registry.replace(card)?;

    Ok(MoveOutcome {
        from,
        to: target,
        position,
        detached_children,
        detached_from,
    })
}

/// Toggle a card's tapped flag, returning the new value
///
/// Any zone is accepted; restricting taps to battlefield and lands is left to callers.
pub fn tap_card(registry: &mut CardRegistry, card_id: InstanceId) -> Result<bool> {
    let mut card = registry.get(card_id)?.clone();
    card.tapped = !card.tapped;
    let tapped = card.tapped;
    registry.replace(card)?;
    Ok(tapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSize;
    use crate::core::CardMeta;
    use crate::TabletopError;
    use std::sync::Arc;

    fn hand_card(registry: &mut CardRegistry, name: &str) -> InstanceId {
        registry.create(Arc::new(CardMeta::new(name)), Zone::Hand, None)
    }

    #[test]
    fn test_move_allocates_cells_in_order() {
        let config = TableConfig::default();
        let mut registry = CardRegistry::new();
        let x = hand_card(&mut registry, "X");
        let y = hand_card(&mut registry, "Y");

        let first = move_card(&mut registry, &config, x, Zone::Battlefield, None).unwrap();
        let second = move_card(&mut registry, &config, y, Zone::Battlefield, None).unwrap();

        assert_eq!(first.position, Some(Position::new(0, 0)));
        assert_eq!(second.position, Some(Position::new(0, 1)));
        assert_eq!(second.from, Zone::Hand);
    }

    #[test]
    fn test_hand_and_stacking_zones_drop_position() {
        let config = TableConfig::default();
        let mut registry = CardRegistry::new();
        let x = hand_card(&mut registry, "X");

        move_card(&mut registry, &config, x, Zone::Battlefield, Some(Position::new(1, 4))).unwrap();
        assert_eq!(registry.get(x).unwrap().position, Some(Position::new(1, 4)));

        move_card(&mut registry, &config, x, Zone::Hand, Some(Position::new(0, 0))).unwrap();
        assert_eq!(registry.get(x).unwrap().position, None);

        move_card(&mut registry, &config, x, Zone::Exile, Some(Position::new(0, 0))).unwrap();
        assert_eq!(registry.get(x).unwrap().position, None);
    }

    #[test]
    fn test_move_untaps() {
        let config = TableConfig::default();
        let mut registry = CardRegistry::new();
        let x = hand_card(&mut registry, "X");

        move_card(&mut registry, &config, x, Zone::Lands, None).unwrap();
        assert!(tap_card(&mut registry, x).unwrap());
        move_card(&mut registry, &config, x, Zone::Battlefield, None).unwrap();
        assert!(!registry.get(x).unwrap().tapped);
    }

    #[test]
    fn test_full_zone_leaves_state_unchanged() {
        let config = TableConfig {
            lands: GridSize::new(1, 1),
            ..TableConfig::default()
        };
        let mut registry = CardRegistry::new();
        let a = hand_card(&mut registry, "A");
        let b = hand_card(&mut registry, "B");

        move_card(&mut registry, &config, a, Zone::Lands, None).unwrap();
        let before = registry.get(b).unwrap().clone();

        let err = move_card(&mut registry, &config, b, Zone::Lands, None).unwrap_err();
        assert!(matches!(err, TabletopError::ZoneFull(Zone::Lands)));
        assert_eq!(registry.get(b).unwrap(), &before);
    }

    #[test]
    fn test_moving_within_zone_can_reuse_own_cell() {
        let config = TableConfig::default();
        let mut registry = CardRegistry::new();
        let x = hand_card(&mut registry, "X");

        move_card(&mut registry, &config, x, Zone::Battlefield, None).unwrap();
        let outcome = move_card(&mut registry, &config, x, Zone::Battlefield, None).unwrap();
        assert_eq!(outcome.position, Some(Position::new(0, 0)));
    }

    #[test]
    fn test_moving_parent_is_not_blocked_by_its_attachments() {
        let config = TableConfig::default();
        let mut registry = CardRegistry::new();
        let host = hand_card(&mut registry, "Host");
        let aura = hand_card(&mut registry, "Aura");
        let other = hand_card(&mut registry, "Other");
        move_card(&mut registry, &config, host, Zone::Battlefield, None).unwrap();
        move_card(&mut registry, &config, aura, Zone::Battlefield, None).unwrap();
        move_card(&mut registry, &config, other, Zone::Battlefield, None).unwrap();
        attachment::attach(&mut registry, aura, host).unwrap();

        let outcome = move_card(&mut registry, &config, host, Zone::Battlefield, None).unwrap();
        assert_eq!(outcome.position, Some(Position::new(0, 0)));

        // A card that is not part of the chain still sees the shared cell as taken
        let outcome = move_card(&mut registry, &config, other, Zone::Battlefield, None).unwrap();
        assert_eq!(outcome.position, Some(Position::new(0, 1)));
    }

    #[test]
    fn test_leaving_battlefield_unwinds_attachments() {
        let config = TableConfig::default();
        let mut registry = CardRegistry::new();
        let host = hand_card(&mut registry, "Host");
        let aura = hand_card(&mut registry, "Aura");
        move_card(&mut registry, &config, host, Zone::Battlefield, None).unwrap();
        move_card(&mut registry, &config, aura, Zone::Battlefield, None).unwrap();
        attachment::attach(&mut registry, aura, host).unwrap();

        let outcome = move_card(&mut registry, &config, host, Zone::Graveyard, None).unwrap();
        assert_eq!(outcome.detached_children, vec![aura]);
        assert_eq!(registry.get(aura).unwrap().attached_to, None);
        assert_eq!(registry.get(aura).unwrap().zone, Zone::Battlefield);
        assert!(registry.get(host).unwrap().attached_cards.is_empty());
    }

    #[test]
    fn test_attached_child_leaving_is_removed_from_parent() {
        let config = TableConfig::default();
        let mut registry = CardRegistry::new();
        let host = hand_card(&mut registry, "Host");
        let aura = hand_card(&mut registry, "Aura");
        move_card(&mut registry, &config, host, Zone::Battlefield, None).unwrap();
        move_card(&mut registry, &config, aura, Zone::Battlefield, None).unwrap();
        attachment::attach(&mut registry, aura, host).unwrap();

        let outcome = move_card(&mut registry, &config, aura, Zone::Hand, None).unwrap();
        assert_eq!(outcome.detached_from, Some(host));
        assert!(registry.get(host).unwrap().attached_cards.is_empty());
        assert_eq!(registry.get(aura).unwrap().attached_to, None);
    }

    #[test]
    fn test_unknown_card() {
        let config = TableConfig::default();
        let mut registry = CardRegistry::new();
        let ghost = InstanceId::new(9);
        assert!(matches!(
            move_card(&mut registry, &config, ghost, Zone::Hand, None),
            Err(TabletopError::CardNotFound(_))
        ));
        assert!(tap_card(&mut registry, ghost).is_err());
    }

    #[test]
    fn test_tap_toggles_in_any_zone() {
        let mut registry = CardRegistry::new();
        let x = hand_card(&mut registry, "X");
        assert!(tap_card(&mut registry, x).unwrap());
        assert!(!tap_card(&mut registry, x).unwrap());
    }
}
