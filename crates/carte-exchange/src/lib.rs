//! # carte-exchange
//!
//! **Exchange Matching Engine**: users pledge a spare copy of a card for any
//! card of the same rarity; a newly published offer is matched against the
//! oldest compatible open offer and both copies move in one step.
//!
//! - **Offer book**: every offer by id, plus open offers indexed by
//!   required rarity in publication order
//! - **Reservations**: derived from active offers, never stored
//! - **No-op trades**: a swap is skipped when either side already owns the
//!   card it would receive
//! - **Exclusivity**: the offer book lock is held across the whole match, so
//!   an offer completes with exactly one partner
//!
//! Lock order: offer book → accounts (ascending `UserId`) → purchase log /
//! notification inbox.

pub mod engine;
pub mod matcher;
pub mod offer_book;
pub mod reservation;

pub use engine::{ExchangeEngine, MatchSummary, PublishOutcome};
pub use matcher::{Swap, attempt_match};
pub use offer_book::OfferBook;
pub use reservation::{ensure_can_publish, has_tradeable_copy};
