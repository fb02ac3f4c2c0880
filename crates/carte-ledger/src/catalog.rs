//! Immutable card catalog.
//!
//! Built once by catalog administration and shared read-only with the
//! engines. Besides lookup by [`CardRef`] it keeps a rarity index so a pack
//! opening can build its buckets without scanning every card.

use std::collections::{BTreeSet, HashMap};

use carte_types::{CardDefinition, CardKind, CardRef, CarteError, Result};

/// The catalog of every collectible card.
#[derive(Debug, Default)]
pub struct CardCatalog {
    cards: HashMap<CardRef, CardDefinition>,
    /// rarity name → ordered refs (kind, then id).
    by_rarity: HashMap<String, BTreeSet<CardRef>>,
}

impl CardCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions.
    pub fn from_definitions(cards: impl IntoIterator<Item = CardDefinition>) -> Result<Self> {
        let mut catalog = Self::new();
        for card in cards {
            catalog.insert(card)?;
        }
        Ok(catalog)
    }

    /// Register a card definition.
    ///
    /// # Errors
    /// - `DuplicateCard` if the reference is already taken
    /// - `Internal` if a kind that requires a tier has none
    pub fn insert(&mut self, card: CardDefinition) -> Result<()> {
        if self.cards.contains_key(&card.card) {
            return Err(CarteError::DuplicateCard(card.card));
        }
        if card.rarity.is_none() && !card.card.kind.allows_missing_rarity() {
            return Err(CarteError::Internal(format!(
                "{} cards require a rarity tier ({})",
                card.card.kind, card.card
            )));
        }
        if let Some(rarity) = &card.rarity {
            self.by_rarity
                .entry(rarity.name.clone())
                .or_default()
                .insert(card.card);
        }
        self.cards.insert(card.card, card);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, card: &CardRef) -> Option<&CardDefinition> {
        self.cards.get(card)
    }

    /// Look up a card, failing with `CardNotFound`.
    pub fn require(&self, card: &CardRef) -> Result<&CardDefinition> {
        self.get(card).ok_or(CarteError::CardNotFound(*card))
    }

    /// Every card carrying the tier, ordered by kind then id.
    #[must_use]
    pub fn cards_with_rarity(&self, rarity: &str) -> Vec<&CardDefinition> {
        self.by_rarity
            .get(rarity)
            .into_iter()
            .flatten()
            .filter_map(|card| self.cards.get(card))
            .collect()
    }

    /// Ids of the cards of one kind carrying the tier, ascending.
    #[must_use]
    pub fn ids_with_rarity(&self, rarity: &str, kind: CardKind) -> Vec<CardRef> {
        self.by_rarity
            .get(rarity)
            .into_iter()
            .flatten()
            .filter(|card| card.kind == kind)
            .copied()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
