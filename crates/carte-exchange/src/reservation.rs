//! Reservation accounting.
//!
//! An active offer (`Open` or `Requested`) pledges one copy of its card.
//! Nothing is locked in the ledger: callers count copies and active offers
//! under the offer book lock and ask these rules.

use carte_types::constants::MIN_FREE_COPIES_TO_PUBLISH;
use carte_types::{CardRef, CarteError, Result};

/// Publishing requires owning the card and keeping one copy back after
/// every active offer, including the new one.
///
/// # Errors
/// - `CardNotOwned` if `owned` is zero
/// - `NoSpareCopy` if fewer than two copies are unpledged
pub fn ensure_can_publish(card: CardRef, owned: usize, reserved: usize) -> Result<()> {
    if owned == 0 {
        return Err(CarteError::CardNotOwned(card));
    }
    if owned.saturating_sub(reserved) < MIN_FREE_COPIES_TO_PUBLISH {
        return Err(CarteError::NoSpareCopy { owned, reserved });
    }
    Ok(())
}

/// Whether an existing offer can still hand over a copy, given the copies
/// pledged by the owner's *other* active offers on the same card.
#[must_use]
pub fn has_tradeable_copy(owned: usize, reserved_by_others: usize) -> bool {
    owned.saturating_sub(reserved_by_others) >= 1
}
