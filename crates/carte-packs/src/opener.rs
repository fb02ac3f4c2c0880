//! Pack purchase: debit, draw and record in one critical section.

use carte_ledger::Ledger;
use carte_types::{
    CarteError, DrawnCard, OwnershipRecord, PackDefinition, PurchaseId, PurchaseOrigin,
    PurchaseRecord, Result, UserId,
};
use rand::Rng;
use serde::Serialize;

use crate::bucket::{RarityBucket, build_buckets, pick_bucket, pick_card};

/// Result of a successful pack purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackOpening {
    pub purchase: PurchaseRecord,
    /// In draw order.
    pub cards: Vec<DrawnCard>,
    pub remaining_credits: u64,
}

/// Buy and open `pack` for `user_id`.
///
/// # Algorithm
///
/// 1. Reject inactive packs
/// 2. Lock the buyer's account and check funds
/// 3. Build rarity buckets from the catalog and require at least one card
/// 4. Draw `cards_per_pack` cards (weighted bucket, then uniform card)
/// 5. Append the sealed purchase, debit the price, insert the copies
///
/// Every fallible check happens before step 5, so a failed opening leaves
/// the balance, the collection and the purchase log untouched.
///
/// # Errors
/// - `PackInactive` if the pack is not on sale
/// - `UserNotFound` for an unknown buyer
/// - `InsufficientCredits` if the balance is below the price
/// - `NoAvailableCards` if no weighted rarity has catalog cards
pub fn open_pack<R: Rng + ?Sized>(
    ledger: &Ledger,
    user_id: UserId,
    pack: &PackDefinition,
    rng: &mut R,
) -> Result<PackOpening> {
    if !pack.is_active {
        tracing::warn!(pack = %pack.id, user = %user_id, "Rejected opening of inactive pack");
        return Err(CarteError::PackInactive(pack.id));
    }
    let catalog = ledger.catalog();

    let opening = ledger.with_account(user_id, |account| {
        account.ensure_funds(pack.price)?;

        if !pack.has_positive_weight() {
            return Err(CarteError::NoAvailableCards {
                reason: format!("{} has no positive rarity weight", pack.id),
            });
        }
        let buckets = build_buckets(pack, catalog);
        if buckets.iter().all(RarityBucket::is_empty) {
            return Err(CarteError::NoAvailableCards {
                reason: format!("{} has no catalog cards in its weighted rarities", pack.id),
            });
        }

        let purchase_id = PurchaseId::new();
        let mut records = Vec::with_capacity(pack.cards_per_pack as usize);
        let mut cards = Vec::with_capacity(pack.cards_per_pack as usize);
        for _ in 0..pack.cards_per_pack {
            let bucket = pick_bucket(&buckets, rng)?;
            let card = pick_card(bucket, rng)?;
            let definition = catalog.require(&card)?;

            let record =
                OwnershipRecord::new(user_id, purchase_id, card, Some(bucket.rarity.clone()));
            cards.push(DrawnCard {
                card,
                name: definition.name.clone(),
                rarity: bucket.rarity.clone(),
                ownership_id: record.id,
            });
            records.push(record);
        }

        let drawn: Vec<_> = records.iter().map(|r| r.card).collect();
        let purchase = PurchaseRecord::seal(
            purchase_id,
            user_id,
            PurchaseOrigin::Pack(pack.id),
            pack.price,
            &drawn,
        );
        ledger.append_purchase(purchase.clone())?;

        // Funds were checked under this same lock; neither step can fail now.
        let remaining_credits = account.debit(pack.price)?;
        for record in records {
            account.insert_copy(record)?;
        }

        Ok(PackOpening {
            purchase,
            cards,
            remaining_credits,
        })
    });

    match &opening {
        Ok(o) => tracing::info!(
            user = %user_id,
            pack = %pack.id,
            purchase = %o.purchase.id,
            cards = o.cards.len(),
            remaining = o.remaining_credits,
            "Pack opened"
        ),
        Err(e) => {
            tracing::warn!(user = %user_id, pack = %pack.id, error = %e, "Pack opening rejected");
        }
    }
    opening
}
