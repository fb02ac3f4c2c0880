//! User-facing exchange operations.

use std::sync::{Arc, Mutex};

use carte_ledger::{Ledger, NotificationSink, lock};
use carte_types::{
    CardId, CardKind, CardRef, CarteError, ExchangeConfig, ExchangeOffer, NotificationDraft,
    OfferId, Result, UserId,
};
use chrono::Utc;
use serde::Serialize;

use crate::matcher::{Swap, attempt_match};
use crate::offer_book::OfferBook;
use crate::reservation::ensure_can_publish;

/// What the publisher learns about an automatic swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub partner: UserId,
    pub partner_name: String,
    pub received_card: CardRef,
    pub received_card_name: String,
    pub sent_card: CardRef,
    pub sent_card_name: String,
}

/// Result of [`ExchangeEngine::publish_offer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    /// The offer as it stands after the match attempt.
    pub offer: ExchangeOffer,
    pub match_result: Option<MatchSummary>,
}

/// Offer book plus the ledger it trades against.
pub struct ExchangeEngine {
    ledger: Arc<Ledger>,
    book: Mutex<OfferBook>,
    sink: Arc<dyn NotificationSink>,
    config: ExchangeConfig,
}

impl ExchangeEngine {
    #[must_use]
    pub fn new(
        ledger: Arc<Ledger>,
        sink: Arc<dyn NotificationSink>,
        config: ExchangeConfig,
    ) -> Self {
        Self {
            ledger,
            book: Mutex::new(OfferBook::new()),
            sink,
            config,
        }
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // =================================================================
    // Publish / match
    // =================================================================

    /// Publish an offer for one spare copy and try to match it at once.
    ///
    /// `kind` is parsed leniently (`"bonus_malus"`, `"BonusMalusCard"`...).
    /// An empty `wants` falls back to the configured template.
    ///
    /// # Errors
    /// `UnsupportedCardKind`, `CardNotFound`, `UserNotFound`,
    /// `CardNotOwned`, `NoSpareCopy`, or `LedgerInconsistency` from the
    /// match (the offer is then left open).
    pub fn publish_offer(
        &self,
        user_id: UserId,
        kind: &str,
        card_id: CardId,
        wants: Option<&str>,
    ) -> Result<PublishOutcome> {
        let kind: CardKind = kind.parse()?;
        let card = CardRef::new(kind, card_id);
        let rarity = self.ledger.catalog().require(&card)?.exchange_rarity();

        let mut book = lock(&self.book, "offer book")?;

        let owned = self.ledger.copies_owned(user_id, card)?;
        let reserved = book.active_reservations(user_id, card, None);
        if let Err(e) = ensure_can_publish(card, owned, reserved) {
            tracing::warn!(user = %user_id, card = %card, owned, reserved, error = %e, "Offer rejected");
            return Err(e);
        }

        let wants = match wants.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => self.config.default_wants(&rarity),
        };
        let sequence = book.next_sequence();
        let offer = ExchangeOffer::open(user_id, card, &rarity, wants, sequence);
        let offer_id = offer.id;
        book.insert(offer)?;
        tracing::info!(offer = %offer_id, user = %user_id, card = %card, rarity = %rarity, "Offer published");

        let swap = attempt_match(&mut book, &self.ledger, offer_id)?;
        let match_result = match swap {
            Some(swap) => Some(self.settle_swap(&swap)?),
            None => None,
        };

        Ok(PublishOutcome {
            offer: book.require(offer_id)?.clone(),
            match_result,
        })
    }

    /// Re-run matching for an offer that is still open.
    pub fn attempt_match(&self, offer_id: OfferId) -> Result<Option<MatchSummary>> {
        let mut book = lock(&self.book, "offer book")?;
        match attempt_match(&mut book, &self.ledger, offer_id)? {
            Some(swap) => Ok(Some(self.settle_swap(&swap)?)),
            None => Ok(None),
        }
    }

    /// Notify both parties and build the publisher's summary.
    fn settle_swap(&self, swap: &Swap) -> Result<MatchSummary> {
        let catalog = self.ledger.catalog();
        let sent = catalog.require(&swap.sent)?;
        let received = catalog.require(&swap.received)?;

        let batch = vec![
            NotificationDraft {
                user_id: swap.publisher,
                title: self.config.notification_title.clone(),
                message: format!(
                    "You traded {sent} with {} and now own {received}.",
                    swap.partner_name
                ),
            },
            NotificationDraft {
                user_id: swap.partner,
                title: self.config.notification_title.clone(),
                message: format!(
                    "You traded {received} with {} and now own {sent}.",
                    swap.publisher_name
                ),
            },
        ];
        // The swap is already committed; a lost notification does not undo it.
        if let Err(e) = self.sink.deliver(batch) {
            tracing::warn!(offer = %swap.offer, error = %e, "Trade notifications not delivered");
        }

        Ok(MatchSummary {
            partner: swap.partner,
            partner_name: swap.partner_name.clone(),
            received_card: swap.received,
            received_card_name: received.name.clone(),
            sent_card: swap.sent,
            sent_card_name: sent.name.clone(),
        })
    }

    // =================================================================
    // Join / cancel
    // =================================================================

    /// Express interest in someone else's open offer (`Open → Requested`).
    /// No cards move.
    ///
    /// # Errors
    /// `OfferNotFound`, `UserNotFound`, `SelfTrade`, `OfferNotOpen`.
    pub fn join_offer(&self, user_id: UserId, offer_id: OfferId) -> Result<ExchangeOffer> {
        if !self.ledger.contains_user(user_id) {
            return Err(CarteError::UserNotFound(user_id));
        }
        let mut book = lock(&self.book, "offer book")?;
        let offer = book.require(offer_id)?;
        if offer.user_id == user_id {
            tracing::warn!(offer = %offer_id, user = %user_id, "Self join rejected");
            return Err(CarteError::SelfTrade);
        }
        let offer = book.mark_requested(offer_id, user_id, Utc::now())?.clone();
        tracing::info!(offer = %offer_id, owner = %offer.user_id, joiner = %user_id, "Offer requested");
        Ok(offer)
    }

    /// Delete one of the caller's offers, whatever its status.
    ///
    /// # Errors
    /// `OfferNotFound`, `NotOfferOwner`.
    pub fn cancel_offer(&self, user_id: UserId, offer_id: OfferId) -> Result<ExchangeOffer> {
        let mut book = lock(&self.book, "offer book")?;
        if book.require(offer_id)?.user_id != user_id {
            tracing::warn!(offer = %offer_id, user = %user_id, "Cancel by non-owner rejected");
            return Err(CarteError::NotOfferOwner(offer_id));
        }
        let removed = book.remove(offer_id)?;
        tracing::info!(offer = %offer_id, user = %user_id, status = %removed.status, "Offer deleted");
        Ok(removed)
    }

    // =================================================================
    // Queries
    // =================================================================

    /// The caller's open and requested offers, newest first.
    pub fn my_offers(&self, user_id: UserId) -> Result<Vec<ExchangeOffer>> {
        let book = lock(&self.book, "offer book")?;
        Ok(book.owned_by(user_id).into_iter().cloned().collect())
    }

    /// Everyone else's open offers, newest first.
    pub fn feed(&self, user_id: UserId) -> Result<Vec<ExchangeOffer>> {
        let book = lock(&self.book, "offer book")?;
        Ok(book.open_feed(user_id).into_iter().cloned().collect())
    }

    pub fn offer(&self, offer_id: OfferId) -> Result<ExchangeOffer> {
        let book = lock(&self.book, "offer book")?;
        book.require(offer_id).cloned()
    }
}
