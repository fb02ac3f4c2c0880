//! # carte-types
//!
//! Shared types, errors, and configuration for the **Carte** game core.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UserId`], [`OfferId`], [`PurchaseId`], [`OwnershipId`], [`NotificationId`], [`CardId`], [`PackId`]
//! - **Card model**: [`CardKind`], [`CardRef`], [`CardDefinition`], [`CardAttributes`], [`RarityTier`]
//! - **Pack model**: [`PackDefinition`], [`RarityWeight`]
//! - **Ledger records**: [`OwnershipRecord`], [`PurchaseRecord`], [`PurchaseOrigin`], [`DrawnCard`]
//! - **Exchange model**: [`ExchangeOffer`], [`OfferStatus`], [`ExchangeNotification`], [`NotificationDraft`]
//! - **Configuration**: [`CarteConfig`], [`LedgerConfig`], [`ExchangeConfig`], [`LoggingConfig`]
//! - **Errors**: [`CarteError`] with `CT_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod card;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod notification;
pub mod offer;
pub mod pack;
pub mod record;

// Re-export all primary types at crate root for ergonomic imports:
//   use carte_types::{CardRef, ExchangeOffer, PackDefinition, ...};

pub use card::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use notification::*;
pub use offer::*;
pub use pack::*;
pub use record::*;

// Constants are accessed via `carte_types::constants::FOO`
// (not re-exported to avoid name collisions).
