//! # carte-packs
//!
//! **Pack Opening Engine**: one purchase is one atomic step.
//!
//! ```text
//! lock account → check funds → build rarity buckets → draw N cards
//!     → append purchase → debit → insert N copies → unlock
//! ```
//!
//! - **Bucket pick**: weighted by the pack's rarity weights, normalised over
//!   the rarities that currently have catalog cards
//! - **Card pick**: uniform over every card of the chosen rarity, across kinds
//! - **No partial packs**: every check runs before the first write

pub mod bucket;
pub mod opener;
pub mod shop;

pub use bucket::{KindPartition, RarityBucket, build_buckets, pick_bucket, pick_card};
pub use opener::{PackOpening, open_pack};
pub use shop::PackShop;
