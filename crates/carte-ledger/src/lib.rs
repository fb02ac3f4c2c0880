//! # carte-ledger
//!
//! **Ledger plane**: the shared mutable state both engines operate on.
//!
//! ## Architecture
//!
//! 1. **CardCatalog**: immutable reference data, indexed by rarity
//! 2. **Account**: one user's credit balance, owned copies and collection index
//! 3. **Ledger**: thread-safe registry of accounts (one lock per user) plus
//!    the append-only purchase log
//! 4. **NotificationInbox**: the [`NotificationSink`] the exchange reports to
//!
//! ## Lock Order
//!
//! ```text
//! offer book → account(min UserId) → account(max UserId) → purchase log | inbox
//! ```
//!
//! Callers that need two accounts go through [`Ledger::with_pair`], which
//! always acquires them in ascending `UserId` order.

pub mod account;
pub mod catalog;
pub mod ledger;
pub mod notification;

pub use account::Account;
pub use catalog::CardCatalog;
pub use ledger::{Ledger, lock};
pub use notification::{NotificationInbox, NotificationSink};
