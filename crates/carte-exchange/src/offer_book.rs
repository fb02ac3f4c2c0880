//! The offer book.
//!
//! - **Offers**: `HashMap<OfferId, ExchangeOffer>` holding every live offer
//!   (completed offers stay for history until their owner deletes them)
//! - **Open index**: `HashMap<rarity, BTreeMap<sequence, OfferId>>`, so the
//!   matcher reads candidates for one rarity oldest first without a scan
//!
//! An offer is in the open index iff its status is `Open`.

use std::collections::{BTreeMap, HashMap};

use carte_types::{CardRef, CarteError, ExchangeOffer, OfferId, OfferStatus, Result, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct OfferBook {
    offers: HashMap<OfferId, ExchangeOffer>,
    open_by_rarity: HashMap<String, BTreeMap<u64, OfferId>>,
    next_sequence: u64,
}

impl OfferBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next publication sequence number.
    pub fn next_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    // =================================================================
    // Insertion / removal
    // =================================================================

    pub fn insert(&mut self, offer: ExchangeOffer) -> Result<()> {
        if self.offers.contains_key(&offer.id) {
            return Err(CarteError::Internal(format!("duplicate offer id {}", offer.id)));
        }
        self.next_sequence = self.next_sequence.max(offer.sequence);
        if offer.is_open() {
            self.index(&offer);
        }
        self.offers.insert(offer.id, offer);
        Ok(())
    }

    /// Delete an offer whatever its status. Returns the removed offer.
    pub fn remove(&mut self, id: OfferId) -> Result<ExchangeOffer> {
        let offer = self.offers.remove(&id).ok_or(CarteError::OfferNotFound(id))?;
        self.unindex(&offer);
        Ok(offer)
    }

    fn index(&mut self, offer: &ExchangeOffer) {
        self.open_by_rarity
            .entry(offer.required_rarity.clone())
            .or_default()
            .insert(offer.sequence, offer.id);
    }

    fn unindex(&mut self, offer: &ExchangeOffer) {
        if let Some(level) = self.open_by_rarity.get_mut(&offer.required_rarity) {
            level.remove(&offer.sequence);
            if level.is_empty() {
                self.open_by_rarity.remove(&offer.required_rarity);
            }
        }
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn get(&self, id: OfferId) -> Option<&ExchangeOffer> {
        self.offers.get(&id)
    }

    pub fn require(&self, id: OfferId) -> Result<&ExchangeOffer> {
        self.get(id).ok_or(CarteError::OfferNotFound(id))
    }

    /// Open offers wanting `rarity`, oldest first.
    #[must_use]
    pub fn open_with_required_rarity(&self, rarity: &str) -> Vec<&ExchangeOffer> {
        self.open_by_rarity
            .get(&rarity.to_lowercase())
            .map(|level| level.values().filter_map(|id| self.offers.get(id)).collect())
            .unwrap_or_default()
    }

    /// Active offers by `user` on `card`, optionally ignoring one offer.
    #[must_use]
    pub fn active_reservations(
        &self,
        user: UserId,
        card: CardRef,
        exclude: Option<OfferId>,
    ) -> usize {
        self.offers
            .values()
            .filter(|o| o.reserves(user, card) && Some(o.id) != exclude)
            .count()
    }

    /// A user's offers that are still open or requested, newest first.
    #[must_use]
    pub fn owned_by(&self, user: UserId) -> Vec<&ExchangeOffer> {
        let mut offers: Vec<_> = self
            .offers
            .values()
            .filter(|o| o.user_id == user && o.status.is_active())
            .collect();
        offers.sort_by_key(|o| std::cmp::Reverse(o.sequence));
        offers
    }

    /// Open offers published by anyone except `viewer`, newest first.
    #[must_use]
    pub fn open_feed(&self, viewer: UserId) -> Vec<&ExchangeOffer> {
        let mut offers: Vec<_> = self
            .offers
            .values()
            .filter(|o| o.is_open() && o.user_id != viewer)
            .collect();
        offers.sort_by_key(|o| std::cmp::Reverse(o.sequence));
        offers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    // =================================================================
    // Status transitions
    // =================================================================

    /// `Open → Requested` on behalf of `by`.
    pub fn mark_requested(
        &mut self,
        id: OfferId,
        by: UserId,
        at: DateTime<Utc>,
    ) -> Result<&ExchangeOffer> {
        let offer = self.offers.get_mut(&id).ok_or(CarteError::OfferNotFound(id))?;
        if offer.status != OfferStatus::Open {
            return Err(CarteError::OfferNotOpen(id));
        }
        offer.status = OfferStatus::Requested;
        offer.requested_by = Some(by);
        offer.requested_at = Some(at);
        offer.updated_at = at;

        let snapshot = offer.clone();
        self.unindex(&snapshot);
        self.require(id)
    }

    /// Complete two open offers against each other with one timestamp.
    /// Both are checked before either changes.
    pub fn complete_pair(&mut self, a: OfferId, b: OfferId, at: DateTime<Utc>) -> Result<()> {
        let owner_a = self.open_owner(a)?;
        let owner_b = self.open_owner(b)?;

        for (id, partner) in [(a, owner_b), (b, owner_a)] {
            if let Some(offer) = self.offers.get_mut(&id) {
                offer.status = OfferStatus::Completed;
                offer.requested_by = Some(partner);
                offer.requested_at = Some(at);
                offer.updated_at = at;
                let snapshot = offer.clone();
                self.unindex(&snapshot);
            }
        }
        Ok(())
    }

    fn open_owner(&self, id: OfferId) -> Result<UserId> {
        let offer = self.require(id)?;
        if !offer.is_open() {
            return Err(CarteError::OfferNotOpen(id));
        }
        Ok(offer.user_id)
    }
}
