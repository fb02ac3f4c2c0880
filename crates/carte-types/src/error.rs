//! Error types for the Carte game core.
//!
//! All errors use the `CT_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Catalog / card errors
//! - 2xx: Credit errors
//! - 3xx: Pack errors
//! - 4xx: Ownership / ledger errors
//! - 5xx: Exchange errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{CardRef, OfferId, PackId, UserId};

/// Message shown to players when an internal error is hidden from them.
pub const GENERIC_FAILURE_MESSAGE: &str = "The operation failed. Please try again later.";

/// Central error enum for all Carte operations.
#[derive(Debug, Error)]
pub enum CarteError {
    // =================================================================
    // Catalog / Card Errors (1xx)
    // =================================================================
    /// The card kind text does not name a known kind.
    #[error("CT_ERR_100: Unsupported card kind: {raw}")]
    UnsupportedCardKind { raw: String },

    /// No catalog row exists for the reference.
    #[error("CT_ERR_101: Card not found: {0}")]
    CardNotFound(CardRef),

    /// A catalog row with this reference was already registered.
    #[error("CT_ERR_102: Card already in catalog: {0}")]
    DuplicateCard(CardRef),

    /// An identifier could not be parsed.
    #[error("CT_ERR_103: Malformed identifier: {raw}")]
    MalformedIdentifier { raw: String },

    // =================================================================
    // Credit Errors (2xx)
    // =================================================================
    /// Not enough credits to complete the purchase.
    #[error("CT_ERR_200: Insufficient credits: need {needed}, have {available}")]
    InsufficientCredits { needed: u64, available: u64 },

    /// A credit operation would overflow the balance.
    #[error("CT_ERR_201: Credit balance overflow")]
    CreditOverflow,

    // =================================================================
    // Pack Errors (3xx)
    // =================================================================
    /// The requested pack does not exist.
    #[error("CT_ERR_300: Pack not found: {0}")]
    PackNotFound(PackId),

    /// The pack exists but is not on sale.
    #[error("CT_ERR_301: Pack is not active: {0}")]
    PackInactive(PackId),

    /// Every configured rarity is weightless or has no catalog cards.
    #[error("CT_ERR_302: No cards available: {reason}")]
    NoAvailableCards { reason: String },

    /// A pack with this id was already registered.
    #[error("CT_ERR_303: Pack already registered: {0}")]
    DuplicatePack(PackId),

    // =================================================================
    // Ownership / Ledger Errors (4xx)
    // =================================================================
    /// The user is not registered in the ledger.
    #[error("CT_ERR_400: User not found: {0}")]
    UserNotFound(UserId),

    /// The user holds no copy of the card.
    #[error("CT_ERR_401: You must own the selected card to trade it: {0}")]
    CardNotOwned(CardRef),

    /// The ledger does not hold the copy a transfer expected to move.
    #[error("CT_ERR_402: Ledger inconsistency: {reason}")]
    LedgerInconsistency { reason: String },

    // =================================================================
    // Exchange Errors (5xx)
    // =================================================================
    /// The offer does not exist.
    #[error("CT_ERR_500: Offer not found: {0}")]
    OfferNotFound(OfferId),

    /// Publishing would leave an outstanding offer without a backing copy.
    #[error(
        "CT_ERR_501: You need an extra copy of this card before publishing the trade: \
         own {owned}, reserved {reserved}"
    )]
    NoSpareCopy { owned: usize, reserved: usize },

    /// A user tried to trade with themselves.
    #[error("CT_ERR_502: You cannot join your own offer")]
    SelfTrade,

    /// The offer has left the `open` state.
    #[error("CT_ERR_503: This offer is no longer available: {0}")]
    OfferNotOpen(OfferId),

    /// Only the owner may cancel an offer.
    #[error("CT_ERR_504: You can only delete your offers: {0}")]
    NotOfferOwner(OfferId),

    /// No notification ids were supplied.
    #[error("CT_ERR_505: Provide notification ids")]
    EmptyNotificationIds,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CT_ERR_900: Internal error: {0}")]
    Internal(String),

    /// A thread panicked while holding a ledger lock.
    #[error("CT_ERR_901: Lock poisoned: {0}")]
    LockPoisoned(&'static str),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("CT_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("CT_ERR_903: Serialization error: {0}")]
    Serialization(String),

    /// I/O error (config files).
    #[error("CT_ERR_904: I/O error: {0}")]
    Io(String),
}

impl CarteError {
    /// Whether the error is an invariant or infrastructure failure rather
    /// than something the caller did wrong.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::LedgerInconsistency { .. }
                | Self::Internal(_)
                | Self::LockPoisoned(_)
                | Self::Configuration(_)
                | Self::Serialization(_)
                | Self::Io(_)
        )
    }

    /// Text safe to show to a player. Internal failures are collapsed into
    /// a generic message; the full error stays in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_internal() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CarteError>;

impl From<std::io::Error> for CarteError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CarteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
