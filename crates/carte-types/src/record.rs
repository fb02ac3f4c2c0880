//! Ledger records: owned copies and the purchase audit trail.
//!
//! A [`PurchaseRecord`] is never mutated after creation. Its `digest`
//! commits to everything the purchase produced so an audit can detect
//! tampering with the copies that cite it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{CardRef, OfferId, OwnershipId, PackId, PurchaseId, UserId};

/// One physical copy of a card held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    pub id: OwnershipId,
    pub owner: UserId,
    /// The purchase (pack opening or exchange transfer) that produced it.
    pub purchase_id: PurchaseId,
    pub card: CardRef,
    /// Rarity at the moment the copy was drawn, not the live catalog value.
    pub rarity: Option<String>,
    pub acquired_at: DateTime<Utc>,
}

impl OwnershipRecord {
    #[must_use]
    pub fn new(
        owner: UserId,
        purchase_id: PurchaseId,
        card: CardRef,
        rarity: Option<String>,
    ) -> Self {
        Self {
            id: OwnershipId::new(),
            owner,
            purchase_id,
            card,
            rarity,
            acquired_at: Utc::now(),
        }
    }
}

/// What produced a purchase record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseOrigin {
    /// A paid pack opening.
    Pack(PackId),
    /// A copy received through a completed exchange.
    ExchangeTransfer(OfferId),
}

impl std::fmt::Display for PurchaseOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pack(pack) => write!(f, "PACK({pack})"),
            Self::ExchangeTransfer(offer) => write!(f, "EXCHANGE({offer})"),
        }
    }
}

/// A card produced by a pack opening, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub card: CardRef,
    pub name: String,
    pub rarity: String,
    pub ownership_id: OwnershipId,
}

/// Append-only audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub origin: PurchaseOrigin,
    /// Credits paid (zero for exchange transfers).
    pub cost: u64,
    pub cards_count: u32,
    pub created_at: DateTime<Utc>,
    /// Hex SHA-256 over id, user, origin, cost and the produced cards.
    pub digest: String,
}

impl PurchaseRecord {
    /// Build a sealed record for the given produced cards.
    #[must_use]
    pub fn seal(
        id: PurchaseId,
        user_id: UserId,
        origin: PurchaseOrigin,
        cost: u64,
        cards: &[CardRef],
    ) -> Self {
        let cards_count = u32::try_from(cards.len()).unwrap_or(u32::MAX);
        Self {
            id,
            user_id,
            origin,
            cost,
            cards_count,
            created_at: Utc::now(),
            digest: Self::compute_digest(id, user_id, origin, cost, cards),
        }
    }

    /// Digest over the purchase contents.
    #[must_use]
    pub fn compute_digest(
        id: PurchaseId,
        user_id: UserId,
        origin: PurchaseOrigin,
        cost: u64,
        cards: &[CardRef],
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"carte:purchase:v1:");
        hasher.update(id.0.as_bytes());
        hasher.update(user_id.0.as_bytes());
        hasher.update(origin.to_string().as_bytes());
        hasher.update(cost.to_le_bytes());
        for card in cards {
            hasher.update(card.to_string().as_bytes());
            hasher.update(b";");
        }
        hex::encode(hasher.finalize())
    }

    /// Re-derive the digest from the given cards and compare.
    #[must_use]
    pub fn verify(&self, cards: &[CardRef]) -> bool {
        Self::compute_digest(self.id, self.user_id, self.origin, self.cost, cards) == self.digest
    }
}
