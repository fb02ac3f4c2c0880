//! System-wide constants for the Carte game core.

/// Credits granted to a newly registered user.
pub const DEFAULT_STARTING_CREDITS: u64 = 500;

/// Cards drawn per opening when a pack does not say otherwise.
pub const DEFAULT_CARDS_PER_PACK: u32 = 5;

/// Colour for rarity names without a fixed colour.
pub const DEFAULT_RARITY_COLOR: &str = "bronze";

/// Exchange rarity assumed for cards without a tier.
pub const FALLBACK_RARITY: &str = "common";

/// Minimum copies owned, beyond those already pledged, to publish an offer:
/// one backs the new offer, one stays in the collection.
pub const MIN_FREE_COPIES_TO_PUBLISH: usize = 2;

/// Default `wants` text; `{rarity}` is replaced with the required rarity.
pub const DEFAULT_WANTS_TEMPLATE: &str = "Any {rarity} card";

/// Title of the notification sent to both parties of a swap.
pub const DEFAULT_TRADE_NOTIFICATION_TITLE: &str = "Trade completed";

/// Default tracing filter for the CLI.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Carte";
