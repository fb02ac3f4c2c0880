//! Identifiers used throughout Carte.
//!
//! Entities created by the engines (users, offers, purchases, ownership
//! rows, notifications) use UUIDv7 for time-ordered sorting. Catalog rows
//! and packs are administered elsewhere and keep their numeric keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a UUIDv7-backed identifier with `new`, `Default` and a
/// prefixed `Display`.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            #[must_use]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a registered player account.
    UserId,
    ""
);

uuid_id!(
    /// Globally unique exchange offer token.
    OfferId,
    "offer:"
);

uuid_id!(
    /// Identifier of an append-only purchase record.
    PurchaseId,
    "purchase:"
);

uuid_id!(
    /// Identifier of a single owned copy of a card.
    OwnershipId,
    "copy:"
);

uuid_id!(
    /// Identifier of an exchange notification.
    NotificationId,
    "notification:"
);

impl OfferId {
    /// Parse an offer token as received from a caller.
    pub fn parse(raw: &str) -> crate::Result<Self> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| crate::CarteError::MalformedIdentifier {
                raw: raw.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Catalog keys
// ---------------------------------------------------------------------------

/// Catalog key of a card definition, unique within its [`crate::CardKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Catalog key of a pack definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PackId(pub u32);

impl fmt::Display for PackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pack:{}", self.0)
    }
}
