//! Automatic counterpart matching for a freshly published offer.
//!
//! ```text
//! attempt_match(book, ledger, offer) -> Option<Swap>
//! ```
//!
//! Runs with the offer book locked by the caller. Each candidate is
//! examined with both users' accounts locked, so the copies counted are the
//! copies moved.

use carte_ledger::{Account, Ledger};
use carte_types::{CardRef, CarteError, ExchangeOffer, OfferId, Result, UserId};
use chrono::{DateTime, Utc};

use crate::offer_book::OfferBook;
use crate::reservation::has_tradeable_copy;

/// A completed two-way swap, seen from the publisher's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swap {
    pub offer: OfferId,
    pub counter_offer: OfferId,
    pub publisher: UserId,
    pub publisher_name: String,
    pub partner: UserId,
    pub partner_name: String,
    /// The card the publisher gave away.
    pub sent: CardRef,
    /// The card the publisher received.
    pub received: CardRef,
    pub completed_at: DateTime<Utc>,
}

enum Verdict {
    Skip(&'static str),
    Swapped {
        publisher_name: String,
        partner_name: String,
    },
}

/// Try to pair `offer_id` with the oldest compatible open offer.
///
/// ## Algorithm
///
/// 1. Re-read the offer; nothing to do unless it is still `Open`
/// 2. The publisher must have a tradeable copy
/// 3. Walk other users' open offers whose required rarity is the rarity of
///    the publisher's card, oldest first
/// 4. Skip a candidate unless it has a tradeable copy, its owner lacks the
///    publisher's card, and the publisher lacks the candidate's card
/// 5. First hit: move one copy each way, complete both offers
///
/// Returns `Ok(None)` when no candidate qualifies; the offer stays open.
///
/// # Errors
/// `LedgerInconsistency` if a copy expected by a transfer is missing. Both
/// copies are located before either moves, so nothing changes in that case.
pub fn attempt_match(
    book: &mut OfferBook,
    ledger: &Ledger,
    offer_id: OfferId,
) -> Result<Option<Swap>> {
    // 1. Re-read under the book lock
    let offer = book.require(offer_id)?.clone();
    if !offer.is_open() {
        return Ok(None);
    }

    // 2. Publisher still has an unpledged copy behind this offer
    let pledged_elsewhere = book.active_reservations(offer.user_id, offer.card, Some(offer.id));
    let owned = ledger.copies_owned(offer.user_id, offer.card)?;
    if !has_tradeable_copy(owned, pledged_elsewhere) {
        tracing::debug!(offer = %offer.id, owned, pledged_elsewhere, "Publisher has no tradeable copy");
        return Ok(None);
    }

    // 3. Candidates wanting the publisher's rarity
    let rarity = ledger.catalog().require(&offer.card)?.exchange_rarity();
    let candidates: Vec<ExchangeOffer> = book
        .open_with_required_rarity(&rarity)
        .into_iter()
        .filter(|c| c.id != offer.id && c.user_id != offer.user_id)
        .cloned()
        .collect();

    for candidate in candidates {
        let candidate_pledged =
            book.active_reservations(candidate.user_id, candidate.card, Some(candidate.id));

        // 4 + 5. Check and swap with both accounts held
        let verdict = ledger.with_pair(offer.user_id, candidate.user_id, |publisher, partner| {
            if !has_tradeable_copy(partner.copies_of(candidate.card), candidate_pledged) {
                return Ok(Verdict::Skip("candidate has no tradeable copy"));
            }
            if partner.holds(offer.card) {
                return Ok(Verdict::Skip("candidate already owns the offered card"));
            }
            if publisher.holds(candidate.card) {
                return Ok(Verdict::Skip("publisher already owns the candidate card"));
            }

            locate_copy(publisher, offer.card, offer.id)?;
            locate_copy(partner, candidate.card, candidate.id)?;
            ledger.transfer_copy(publisher, partner, offer.card, offer.id)?;
            ledger.transfer_copy(partner, publisher, candidate.card, candidate.id)?;

            Ok(Verdict::Swapped {
                publisher_name: publisher.username().to_string(),
                partner_name: partner.username().to_string(),
            })
        });

        match verdict {
            Ok(Verdict::Skip(reason)) => {
                tracing::debug!(offer = %offer.id, candidate = %candidate.id, reason, "Candidate skipped");
            }
            Ok(Verdict::Swapped {
                publisher_name,
                partner_name,
            }) => {
                let completed_at = Utc::now();
                book.complete_pair(offer.id, candidate.id, completed_at)?;
                tracing::info!(
                    offer = %offer.id,
                    counter_offer = %candidate.id,
                    publisher = %offer.user_id,
                    partner = %candidate.user_id,
                    sent = %offer.card,
                    received = %candidate.card,
                    "Exchange completed"
                );
                return Ok(Some(Swap {
                    offer: offer.id,
                    counter_offer: candidate.id,
                    publisher: offer.user_id,
                    publisher_name,
                    partner: candidate.user_id,
                    partner_name,
                    sent: offer.card,
                    received: candidate.card,
                    completed_at,
                }));
            }
            Err(e) => {
                if matches!(e, CarteError::LedgerInconsistency { .. }) {
                    tracing::error!(offer = %offer.id, candidate = %candidate.id, error = %e, "Exchange aborted");
                }
                return Err(e);
            }
        }
    }

    Ok(None)
}

fn locate_copy(account: &Account, card: CardRef, offer: OfferId) -> Result<()> {
    if account.records_of(card).next().is_none() {
        return Err(CarteError::LedgerInconsistency {
            reason: format!(
                "no copy of {card} held by {} for {offer}",
                account.user_id()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use carte_ledger::CardCatalog;
    use carte_types::{
        CardDefinition, CardId, CardKind, LedgerConfig, OfferStatus, OwnershipRecord, PackId,
        PurchaseId, PurchaseOrigin, PurchaseRecord,
    };
    use super::*;

    fn player(id: u32) -> CardRef {
        CardRef::new(CardKind::Player, CardId(id))
    }

    fn ledger() -> Ledger {
        let catalog = CardCatalog::from_definitions([
            CardDefinition::dummy_player(1, "Rossi", "rare"),
            CardDefinition::dummy_player(2, "Verdi", "rare"),
            CardDefinition::dummy_player(3, "Neri", "rare"),
            CardDefinition::dummy_player(4, "Gialli", "common"),
        ])
        .unwrap();
        Ledger::new(Arc::new(catalog), LedgerConfig::default())
    }

    fn grant(ledger: &Ledger, user: UserId, card: CardRef, copies: usize) {
        ledger
            .with_account(user, |a| {
                for _ in 0..copies {
                    let p = PurchaseRecord::seal(
                        PurchaseId::new(),
                        user,
                        PurchaseOrigin::Pack(PackId(1)),
                        0,
                        &[card],
                    );
                    a.insert_copy(OwnershipRecord::new(user, p.id, card, Some("rare".into())))?;
                }
                Ok(())
            })
            .unwrap();
    }

    fn publish(book: &mut OfferBook, user: UserId, card: CardRef, rarity: &str) -> OfferId {
        let seq = book.next_sequence();
        let offer = ExchangeOffer::open(user, card, rarity, "any", seq);
        let id = offer.id;
        book.insert(offer).unwrap();
        id
    }

    #[test]
    fn matches_oldest_compatible_candidate() {
        let ledger = ledger();
        let mut book = OfferBook::new();
        let (a, b, c) = (
            ledger.register_user("a").unwrap(),
            ledger.register_user("b").unwrap(),
            ledger.register_user("c").unwrap(),
        );
        grant(&ledger, a, player(1), 2);
        grant(&ledger, b, player(2), 2);
        grant(&ledger, c, player(3), 2);

        let from_b = publish(&mut book, b, player(2), "rare");
        let _from_c = publish(&mut book, c, player(3), "rare");
        let from_a = publish(&mut book, a, player(1), "rare");

        let swap = attempt_match(&mut book, &ledger, from_a).unwrap().unwrap();
        assert_eq!(swap.counter_offer, from_b);
        assert_eq!(swap.partner, b);
        assert_eq!(swap.partner_name, "b");
        assert_eq!(swap.received, player(2));
        assert_eq!(book.get(from_a).unwrap().status, OfferStatus::Completed);
        assert_eq!(ledger.copies_owned(a, player(2)).unwrap(), 1);
        assert_eq!(ledger.copies_owned(b, player(1)).unwrap(), 1);
    }

    #[test]
    fn skips_candidates_that_would_duplicate() {
        let ledger = ledger();
        let mut book = OfferBook::new();
        let (a, b) = (ledger.register_user("a").unwrap(), ledger.register_user("b").unwrap());
        grant(&ledger, a, player(1), 2);
        grant(&ledger, a, player(2), 1);
        grant(&ledger, b, player(2), 2);

        let _from_b = publish(&mut book, b, player(2), "rare");
        let from_a = publish(&mut book, a, player(1), "rare");

        assert!(attempt_match(&mut book, &ledger, from_a).unwrap().is_none());
        assert!(book.get(from_a).unwrap().is_open());
        assert_eq!(ledger.copies_owned(a, player(1)).unwrap(), 2);
    }

    #[test]
    fn rarity_must_match_the_publisher_card() {
        let ledger = ledger();
        let mut book = OfferBook::new();
        let (a, b) = (ledger.register_user("a").unwrap(), ledger.register_user("b").unwrap());
        grant(&ledger, a, player(1), 2);
        grant(&ledger, b, player(4), 2);

        let _from_b = publish(&mut book, b, player(4), "common");
        let from_a = publish(&mut book, a, player(1), "rare");
        assert!(attempt_match(&mut book, &ledger, from_a).unwrap().is_none());
    }

    #[test]
    fn non_open_offer_is_a_no_op() {
        let ledger = ledger();
        let mut book = OfferBook::new();
        let a = ledger.register_user("a").unwrap();
        grant(&ledger, a, player(1), 2);
        let id = publish(&mut book, a, player(1), "rare");
        book.mark_requested(id, UserId::new(), Utc::now()).unwrap();
        assert!(attempt_match(&mut book, &ledger, id).unwrap().is_none());
    }

    #[test]
    fn candidate_without_tradeable_copy_is_skipped() {
        let ledger = ledger();
        let mut book = OfferBook::new();
        let (a, b) = (ledger.register_user("a").unwrap(), ledger.register_user("b").unwrap());
        grant(&ledger, a, player(1), 2);
        grant(&ledger, b, player(2), 1);

        // Two active offers on one copy: neither can hand it over.
        let _b1 = publish(&mut book, b, player(2), "rare");
        let _b2 = publish(&mut book, b, player(2), "rare");
        let from_a = publish(&mut book, a, player(1), "rare");

        assert!(attempt_match(&mut book, &ledger, from_a).unwrap().is_none());
        assert_eq!(ledger.copies_owned(b, player(2)).unwrap(), 1);
    }
}
