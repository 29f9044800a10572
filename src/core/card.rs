//! Card metadata and card instances

use crate::core::InstanceId;
use crate::zones::Zone;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Card types printed on the type line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Land,
    Planeswalker,
    Battle,
}

impl CardType {
    /// Parse a single type-line word ("Creature", "land", ...)
    pub fn from_word(word: &str) -> Option<CardType> {
        match word.to_ascii_lowercase().as_str() {
            "creature" => Some(CardType::Creature),
            "instant" => Some(CardType::Instant),
            "sorcery" => Some(CardType::Sorcery),
            "enchantment" => Some(CardType::Enchantment),
            "artifact" => Some(CardType::Artifact),
            "land" => Some(CardType::Land),
            "planeswalker" => Some(CardType::Planeswalker),
            "battle" => Some(CardType::Battle),
            _ => None,
        }
    }
}

/// Colors of a card's color identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub fn from_symbol(symbol: char) -> Option<Color> {
        match symbol.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "W"),
            Color::Blue => write!(f, "U"),
            Color::Black => write!(f, "B"),
            Color::Red => write!(f, "R"),
            Color::Green => write!(f, "G"),
        }
    }
}

/// Display metadata supplied by the card catalog
///
/// The engine never looks inside this struct; it is carried along so the presentation
/// layer can render the card. Shared between instances through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardMeta {
    /// Catalog identity (e.g. a card database ID); several instances may share it
    pub catalog_id: String,

    /// Card name (e.g., "Grizzly Bears")
    pub name: String,

    /// Mana cost as printed (e.g., "{1}{G}")
    pub mana_cost: String,

    /// Full type line (e.g., "Creature — Bear")
    pub type_line: String,

    /// Card types parsed from the type line
    pub types: SmallVec<[CardType; 2]>,

    /// Color identity
    pub color_identity: SmallVec<[Color; 2]>,

    /// Oracle text
    pub oracle_text: String,

    /// Artwork reference (URL or file path)
    pub image_ref: Option<String>,
}

impl CardMeta {
    pub fn new(name: impl Into<String>) -> Self {
        CardMeta {
            name: name.into(),
            ..CardMeta::default()
        }
    }

    pub fn with_catalog_id(mut self, catalog_id: impl Into<String>) -> Self {
        self.catalog_id = catalog_id.into();
        self
    }

    pub fn with_mana_cost(mut self, cost: impl Into<String>) -> Self {
        self.mana_cost = cost.into();
        self
    }

    /// Set the type line and derive `types` from its words
    pub fn with_type_line(mut self, type_line: impl Into<String>) -> Self {
        self.type_line = type_line.into();
        self.types = self
            .type_line
            .split_whitespace()
            .filter_map(CardType::from_word)
            .collect();
        self
    }

    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.color_identity = colors.into_iter().collect();
        self
    }

    pub fn with_oracle_text(mut self, text: impl Into<String>) -> Self {
        self.oracle_text = text.into();
        self
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }
}

/// A grid cell inside a positioned zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One physical copy of a card on the table
///
/// Records are never edited field-by-field from outside the engine: operations clone the
/// current record, build the new one and hand it to `CardRegistry::replace`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique ID for this card instance
    pub id: InstanceId,

    /// Catalog metadata (immutable, shared)
    pub meta: Arc<CardMeta>,

    /// Current zone
    pub zone: Zone,

    /// Is the card tapped?
    pub tapped: bool,

    /// Grid cell, present only while in a grid zone
    pub position: Option<Position>,

    /// The card this one is attached to
    pub attached_to: Option<InstanceId>,

    /// Cards attached to this one, in attach order
    pub attached_cards: SmallVec<[InstanceId; 2]>,

    /// Sequence number stamped by the registry when the card entered its zone
    pub arrival: u32,
}

impl CardInstance {
    pub fn new(id: InstanceId, meta: Arc<CardMeta>, zone: Zone) -> Self {
        CardInstance {
            id,
            meta,
            zone,
            tapped: false,
            position: None,
            attached_to: None,
            attached_cards: SmallVec::new(),
            arrival: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn is_attached(&self) -> bool {
        self.attached_to.is_some()
    }

    pub fn has_attachments(&self) -> bool {
        !self.attached_cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_builder() {
        let meta = CardMeta::new("Grizzly Bears")
            .with_catalog_id("bears-001")
            .with_mana_cost("{1}{G}")
            .with_type_line("Creature — Bear")
            .with_colors([Color::Green]);

        assert_eq!(meta.name, "Grizzly Bears");
        assert!(meta.is_type(CardType::Creature));
        assert!(!meta.is_type(CardType::Land));
        assert_eq!(meta.color_identity.as_slice(), &[Color::Green]);
    }

    #[test]
    fn test_type_line_with_multiple_types() {
        let meta = CardMeta::new("Dryad Arbor").with_type_line("Land Creature — Forest Dryad");
        assert!(meta.is_type(CardType::Land));
        assert!(meta.is_type(CardType::Creature));
        assert_eq!(meta.types.len(), 2);
    }

    #[test]
    fn test_new_instance_is_untapped_and_unattached() {
        let card = CardInstance::new(
            InstanceId::new(1),
            Arc::new(CardMeta::new("Forest")),
            Zone::Hand,
        );

        assert_eq!(card.name(), "Forest");
        assert!(!card.tapped);
        assert!(card.position.is_none());
        assert!(!card.is_attached());
        assert!(!card.has_attachments());
    }

    #[test]
    fn test_color_symbols() {
        assert_eq!(Color::from_symbol('u'), Some(Color::Blue));
        assert_eq!(Color::from_symbol('X'), None);
        assert_eq!(Color::Black.to_string(), "B");
    }
}
