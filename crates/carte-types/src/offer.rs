//! Exchange offer types.
//!
//! An offer pledges one copy of a card the owner holds in exchange for any
//! card of the required rarity. Offers do not lock anything in the ledger;
//! the copies they reserve are derived on demand from the set of active
//! offers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CardRef, OfferId, UserId};

/// Lifecycle status of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OfferStatus {
    Open,
    Requested,
    Completed,
    Cancelled,
}

impl OfferStatus {
    /// Open and requested offers still reserve a copy.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::Requested)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Requested => write!(f, "REQUESTED"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A published trade offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeOffer {
    pub id: OfferId,
    pub user_id: UserId,
    /// The card instance being given away.
    pub card: CardRef,
    /// Lower-cased rarity wanted in return.
    pub required_rarity: String,
    pub wants: String,
    pub status: OfferStatus,
    pub requested_by: Option<UserId>,
    pub requested_at: Option<DateTime<Utc>>,
    /// Publication order; the matcher scans oldest first.
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExchangeOffer {
    /// A fresh open offer.
    #[must_use]
    pub fn open(
        user_id: UserId,
        card: CardRef,
        required_rarity: impl Into<String>,
        wants: impl Into<String>,
        sequence: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OfferId::new(),
            user_id,
            card,
            required_rarity: required_rarity.into().to_lowercase(),
            wants: wants.into(),
            status: OfferStatus::Open,
            requested_by: None,
            requested_at: None,
            sequence,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == OfferStatus::Open
    }

    /// Whether this offer pledges a copy of `card` on behalf of `user`.
    #[must_use]
    pub fn reserves(&self, user: UserId, card: CardRef) -> bool {
        self.user_id == user && self.card == card && self.status.is_active()
    }
}
