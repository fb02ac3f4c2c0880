//! Card catalog model.
//!
//! Every collectible is addressed by a [`CardRef`]: a closed tag over the
//! known [`CardKind`]s plus the catalog key within that kind. Anything that
//! can be owned, drawn or traded goes through this reference.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CardId, CarteError, constants};

/// The closed set of card kinds.
///
/// Declaration order is the deterministic partition order used when a
/// rarity bucket is flattened for a uniform draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CardKind {
    Player,
    Goalkeeper,
    Coach,
    BonusMalus,
}

impl CardKind {
    /// All kinds in partition order.
    pub const ALL: [Self; 4] = [Self::Player, Self::Goalkeeper, Self::Coach, Self::BonusMalus];

    /// Canonical label used by client surfaces.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Goalkeeper => "goalkeeper",
            Self::Coach => "coach",
            Self::BonusMalus => "bonusMalus",
        }
    }

    /// Whether catalog rows of this kind may exist without a rarity tier.
    #[must_use]
    pub fn allows_missing_rarity(self) -> bool {
        self == Self::BonusMalus
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CardKind {
    type Err = CarteError;

    /// Lenient parse: `_`, `-` and the word `card` are ignored, case is folded.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let simplified = raw
            .replace(['_', '-'], "")
            .to_lowercase()
            .replace("card", "");
        match simplified.trim() {
            "player" => Ok(Self::Player),
            "goalkeeper" => Ok(Self::Goalkeeper),
            "coach" => Ok(Self::Coach),
            "bonusmalus" => Ok(Self::BonusMalus),
            _ => Err(CarteError::UnsupportedCardKind {
                raw: raw.to_string(),
            }),
        }
    }
}

/// Tagged reference to one catalog card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardRef {
    pub kind: CardKind,
    pub id: CardId,
}

impl CardRef {
    #[must_use]
    pub fn new(kind: CardKind, id: CardId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for CardRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.id)
    }
}

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// A rarity tier. Names are unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RarityTier {
    pub name: String,
    pub color: String,
}

impl RarityTier {
    /// Create a tier; well-known names get their fixed display colour.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let color = match name.as_str() {
            "common" => "bronze",
            "rare" => "silver",
            "epic" => "gold",
            "legendary" => "emerald",
            _ => constants::DEFAULT_RARITY_COLOR,
        };
        Self {
            name,
            color: color.to_string(),
        }
    }

    /// Lower-cased name used for exchange compatibility.
    #[must_use]
    pub fn exchange_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Kind-specific stats or effect text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardAttributes {
    /// Outfield players and goalkeepers.
    Athlete {
        team: String,
        attack: i32,
        defense: i32,
        abilities: Option<String>,
    },
    Coach {
        team: String,
        attack_bonus: Decimal,
        defense_bonus: Decimal,
    },
    BonusMalus {
        effect: Option<String>,
        /// Number of turns the effect lasts.
        duration: i32,
    },
}

/// An immutable catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub card: CardRef,
    pub name: String,
    pub rarity: Option<RarityTier>,
    pub attributes: CardAttributes,
}

impl CardDefinition {
    /// Rarity used for exchange compatibility; untiered cards count as common.
    #[must_use]
    pub fn exchange_rarity(&self) -> String {
        self.rarity
            .as_ref()
            .map_or_else(|| constants::FALLBACK_RARITY.to_string(), RarityTier::exchange_key)
    }

    #[must_use]
    pub fn rarity_name(&self) -> Option<&str> {
        self.rarity.as_ref().map(|r| r.name.as_str())
    }
}

impl fmt::Display for CardDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rarity {
            Some(rarity) => write!(f, "{} - {}", self.name, rarity),
            None => write!(f, "{} - none", self.name),
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl CardDefinition {
    pub fn dummy_player(id: u32, name: &str, rarity: &str) -> Self {
        Self {
            card: CardRef::new(CardKind::Player, CardId(id)),
            name: name.to_string(),
            rarity: Some(RarityTier::new(rarity)),
            attributes: CardAttributes::Athlete {
                team: "BERGAMO".to_string(),
                attack: 70,
                defense: 60,
                abilities: None,
            },
        }
    }

    pub fn dummy_coach(id: u32, name: &str, rarity: &str) -> Self {
        Self {
            card: CardRef::new(CardKind::Coach, CardId(id)),
            name: name.to_string(),
            rarity: Some(RarityTier::new(rarity)),
            attributes: CardAttributes::Coach {
                team: "VIOLA".to_string(),
                attack_bonus: Decimal::new(15, 1),
                defense_bonus: Decimal::new(5, 1),
            },
        }
    }

    pub fn dummy_bonus(id: u32, name: &str, rarity: Option<&str>) -> Self {
        Self {
            card: CardRef::new(CardKind::BonusMalus, CardId(id)),
            name: name.to_string(),
            rarity: rarity.map(RarityTier::new),
            attributes: CardAttributes::BonusMalus {
                effect: Some("+1 attack".to_string()),
                duration: 2,
            },
        }
    }
}
