//! Card registry: the authoritative store of card instances
//!
//! Every read goes through the accessors below and every write goes through
//! [`CardRegistry::replace`], which swaps a whole record in one step. Nothing else in the
//! crate holds a `&mut CardInstance`.

use crate::core::{CardInstance, CardMeta, InstanceId, Position};
use crate::zones::Zone;
use crate::{Result, TabletopError};
use deunicode::deunicode;
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    cards: FxHashMap<InstanceId, CardInstance>,
    next_id: u32,
    next_arrival: u32,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new card instance (setup only; instances are never removed)
    pub fn create(
        &mut self,
        meta: Arc<CardMeta>,
        zone: Zone,
        position: Option<Position>,
    ) -> InstanceId {
        let id = InstanceId::new(self.next_id);
        self.next_id += 1;

        let mut card = CardInstance::new(id, meta, zone);
        card.position = position;
        card.arrival = self.stamp_arrival();
        self.cards.insert(id, card);
        id
    }

    fn stamp_arrival(&mut self) -> u32 {
        let arrival = self.next_arrival;
        self.next_arrival += 1;
        arrival
    }

    pub fn get(&self, id: InstanceId) -> Result<&CardInstance> {
        self.cards.get(&id).ok_or(TabletopError::CardNotFound(id))
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.cards.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over every card in ID order
    pub fn iter(&self) -> impl Iterator<Item = &CardInstance> {
        (0..self.next_id).filter_map(move |i| self.cards.get(&InstanceId::new(i)))
    }

    /// Cards in a zone, oldest arrival first
    pub fn cards_in_zone(&self, zone: Zone) -> Vec<&CardInstance> {
        let mut cards: Vec<_> = self.cards.values().filter(|c| c.zone == zone).collect();
        cards.sort_by_key(|c| c.arrival);
        cards
    }

    /// Cells taken in a zone by cards other than those in `ignore`
    pub fn occupied_cells<'a>(
        &'a self,
        zone: Zone,
        ignore: &'a [InstanceId],
    ) -> impl Iterator<Item = Position> + 'a {
        self.cards
            .values()
            .filter(move |c| c.zone == zone && !ignore.contains(&c.id))
            .filter_map(|c| c.position)
    }

    /// Find the first card (by ID) whose name matches, ignoring case and diacritics
    pub fn find_by_name(&self, name: &str) -> Option<&CardInstance> {
        let wanted = normalize_name(name);
        self.iter().find(|c| normalize_name(c.name()) == wanted)
    }

    /// Replace a card's record as a single unit
    ///
    /// The record must already exist. If the new record sits in a different zone than
    /// the stored one, it gets a fresh arrival stamp.
    pub fn replace(&mut self, mut card: CardInstance) -> Result<()> {
        let previous_zone = self.get(card.id)?.zone;
        if previous_zone != card.zone {
            card.arrival = self.stamp_arrival();
        }
        self.cards.insert(card.id, card);
        Ok(())
    }
}

fn normalize_name(name: &str) -> String {
    deunicode(name).trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> Arc<CardMeta> {
        Arc::new(CardMeta::new(name))
    }

    #[test]
    fn test_create_and_get() {
        let mut registry = CardRegistry::new();
        let a = registry.create(meta("Llanowar Elves"), Zone::Hand, None);
        let b = registry.create(meta("Llanowar Elves"), Zone::Hand, None);

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(a).unwrap().name(), "Llanowar Elves");
        assert!(matches!(
            registry.get(InstanceId::new(99)),
            Err(TabletopError::CardNotFound(_))
        ));
    }

    #[test]
    fn test_replace_unknown_card_fails() {
        let mut registry = CardRegistry::new();
        let card = CardInstance::new(InstanceId::new(5), meta("Ghost"), Zone::Hand);
        assert!(registry.replace(card).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_replace_restamps_arrival_on_zone_change() {
        let mut registry = CardRegistry::new();
        let a = registry.create(meta("A"), Zone::Graveyard, None);
        let b = registry.create(meta("B"), Zone::Hand, None);

        let mut moved = registry.get(b).unwrap().clone();
        moved.zone = Zone::Graveyard;
        registry.replace(moved).unwrap();

        let order: Vec<_> = registry
            .cards_in_zone(Zone::Graveyard)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(order, vec![a, b]);

        // Same-zone replacement keeps the stamp
        let before = registry.get(a).unwrap().arrival;
        let mut tapped = registry.get(a).unwrap().clone();
        tapped.tapped = true;
        registry.replace(tapped).unwrap();
        assert_eq!(registry.get(a).unwrap().arrival, before);
    }

    #[test]
    fn test_occupied_cells_ignores_card() {
        let mut registry = CardRegistry::new();
        let a = registry.create(meta("A"), Zone::Battlefield, Some(Position::new(0, 0)));
        registry.create(meta("B"), Zone::Battlefield, Some(Position::new(0, 1)));
        registry.create(meta("C"), Zone::Lands, Some(Position::new(0, 2)));

        let mut cells: Vec<_> = registry.occupied_cells(Zone::Battlefield, &[]).collect();
        cells.sort();
        assert_eq!(cells, vec![Position::new(0, 0), Position::new(0, 1)]);

        let cells: Vec<_> = registry.occupied_cells(Zone::Battlefield, &[a]).collect();
        assert_eq!(cells, vec![Position::new(0, 1)]);
    }

    #[test]
    fn test_find_by_name_ignores_diacritics() {
        let mut registry = CardRegistry::new();
        registry.create(meta("Forest"), Zone::Hand, None);
        let vault = registry.create(meta("Lim-Dûl's Vault"), Zone::Hand, None);

        assert_eq!(registry.find_by_name("lim-dul's vault").map(|c| c.id), Some(vault));
        assert!(registry.find_by_name("Island").is_none());
    }

    #[test]
    fn test_iter_is_in_id_order() {
        let mut registry = CardRegistry::new();
        for name in ["A", "B", "C", "D"] {
            registry.create(meta(name), Zone::Hand, None);
        }
        let names: Vec<_> = registry.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }
}
