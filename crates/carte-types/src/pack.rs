//! Pack definitions: price, draw count and rarity odds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PackId, constants};

/// Relative draw weight of one rarity inside a pack.
///
/// Weights are percentages (e.g. `89.890`) but are normalised at draw time,
/// so they need not sum to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityWeight {
    pub rarity: String,
    pub weight: Decimal,
}

impl RarityWeight {
    #[must_use]
    pub fn new(rarity: impl Into<String>, weight: Decimal) -> Self {
        Self {
            rarity: rarity.into(),
            weight,
        }
    }
}

/// A purchasable pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackDefinition {
    pub id: PackId,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Price in credits.
    pub price: u64,
    pub cards_per_pack: u32,
    pub is_active: bool,
    pub rarity_weights: Vec<RarityWeight>,
}

impl PackDefinition {
    /// New active pack with the default draw count and no odds configured.
    #[must_use]
    pub fn new(id: PackId, name: impl Into<String>, price: u64) -> Self {
        let name = name.into();
        let slug = name.to_lowercase().replace(' ', "-");
        Self {
            id,
            name,
            slug,
            description: String::new(),
            price,
            cards_per_pack: constants::DEFAULT_CARDS_PER_PACK,
            is_active: true,
            rarity_weights: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_cards_per_pack(mut self, cards: u32) -> Self {
        self.cards_per_pack = cards;
        self
    }

    /// Add or replace the weight for a rarity (one weight per rarity).
    #[must_use]
    pub fn with_weight(mut self, rarity: impl Into<String>, weight: Decimal) -> Self {
        let rarity = rarity.into();
        self.rarity_weights.retain(|w| w.rarity != rarity);
        self.rarity_weights.push(RarityWeight::new(rarity, weight));
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Sum of every configured weight, including rarities without cards.
    #[must_use]
    pub fn total_weight(&self) -> Decimal {
        self.rarity_weights.iter().map(|w| w.weight).sum()
    }

    /// Whether any rarity can be drawn at all.
    #[must_use]
    pub fn has_positive_weight(&self) -> bool {
        self.rarity_weights.iter().any(|w| w.weight > Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starter() -> PackDefinition {
        PackDefinition::new(PackId(1), "Starter Pack", 100)
            .with_cards_per_pack(1)
            .with_weight("common", Decimal::new(90, 0))
            .with_weight("rare", Decimal::new(10, 0))
    }

    #[test]
    fn slug_is_derived_from_name() {
        assert_eq!(starter().slug, "starter-pack");
    }

    #[test]
    fn total_weight_sums_all_rarities() {
        assert_eq!(starter().total_weight(), Decimal::new(100, 0));
    }

    #[test]
    fn with_weight_replaces_existing() {
        let pack = starter().with_weight("rare", Decimal::new(5, 0));
        assert_eq!(pack.rarity_weights.len(), 2);
        assert_eq!(pack.total_weight(), Decimal::new(95, 0));
    }

    #[test]
    fn zero_weights_are_not_drawable() {
        let pack = PackDefinition::new(PackId(2), "Empty", 10).with_weight("common", Decimal::ZERO);
        assert!(!pack.has_positive_weight());
        assert!(starter().has_positive_weight());
    }

    #[test]
    fn default_cards_per_pack() {
        let pack = PackDefinition::new(PackId(3), "Basic", 50);
        assert_eq!(pack.cards_per_pack, 5);
        assert!(pack.is_active);
        assert!(!pack.inactive().is_active);
    }
}
