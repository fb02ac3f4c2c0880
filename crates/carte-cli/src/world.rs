//! The catalog, packs and players a session runs against.

use std::path::Path;

use carte_types::{
    CardAttributes, CardDefinition, CardId, CardKind, CardRef, PackDefinition, PackId,
    RarityTier, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub cards: Vec<CardDefinition>,
    pub packs: Vec<PackDefinition>,
    pub players: Vec<String>,
}

impl World {
    /// Load a world from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// A small built-in league.
    #[must_use]
    pub fn builtin() -> Self {
        let cards = vec![
            athlete(CardKind::Player, 1, "Marco Ferri", "common", "ORBETELLO", 62, 48),
            athlete(CardKind::Player, 2, "Luca Gatti", "common", "ORBETELLO", 55, 60),
            athlete(CardKind::Player, 3, "Paolo Sala", "common", "VALLEVERDE", 58, 52),
            athlete(CardKind::Player, 4, "Dario Conti", "rare", "VALLEVERDE", 74, 61),
            athlete(CardKind::Player, 5, "Enzo Riva", "epic", "ORBETELLO", 88, 70),
            athlete(CardKind::Goalkeeper, 1, "Ivo Neri", "common", "VALLEVERDE", 10, 66),
            athlete(CardKind::Goalkeeper, 2, "Tito Lodi", "rare", "ORBETELLO", 12, 79),
            coach(1, "Bruno Valli", "rare", "ORBETELLO", Decimal::new(15, 1), Decimal::new(5, 1)),
            coach(2, "Aldo Testa", "epic", "VALLEVERDE", Decimal::new(10, 1), Decimal::new(20, 1)),
            bonus(1, "Pioggia", None, "-1 attack to both sides", 1),
            bonus(2, "Curva in festa", Some("common"), "+2 attack", 2),
        ];
        let packs = vec![
            PackDefinition::new(PackId(1), "Starter Pack", 100)
                .with_weight("common", Decimal::new(70, 0))
                .with_weight("rare", Decimal::new(25, 0))
                .with_weight("epic", Decimal::new(5, 0)),
            PackDefinition::new(PackId(2), "Campioni", 250)
                .with_cards_per_pack(3)
                .with_weight("rare", Decimal::new(60, 0))
                .with_weight("epic", Decimal::new(30, 0))
                .with_weight("legendary", Decimal::new(10, 0)),
        ];
        Self {
            cards,
            packs,
            players: vec!["alice".into(), "bruno".into(), "carla".into()],
        }
    }
}

fn athlete(
    kind: CardKind,
    id: u32,
    name: &str,
    rarity: &str,
    team: &str,
    attack: i32,
    defense: i32,
) -> CardDefinition {
    CardDefinition {
        card: CardRef::new(kind, CardId(id)),
        name: name.to_string(),
        rarity: Some(RarityTier::new(rarity)),
        attributes: CardAttributes::Athlete {
            team: team.to_string(),
            attack,
            defense,
            abilities: None,
        },
    }
}

fn coach(
    id: u32,
    name: &str,
    rarity: &str,
    team: &str,
    attack_bonus: Decimal,
    defense_bonus: Decimal,
) -> CardDefinition {
    CardDefinition {
        card: CardRef::new(CardKind::Coach, CardId(id)),
        name: name.to_string(),
        rarity: Some(RarityTier::new(rarity)),
        attributes: CardAttributes::Coach {
            team: team.to_string(),
            attack_bonus,
            defense_bonus,
        },
    }
}

fn bonus(id: u32, name: &str, rarity: Option<&str>, effect: &str, duration: i32) -> CardDefinition {
    CardDefinition {
        card: CardRef::new(CardKind::BonusMalus, CardId(id)),
        name: name.to_string(),
        rarity: rarity.map(RarityTier::new),
        attributes: CardAttributes::BonusMalus {
            effect: Some(effect.to_string()),
            duration,
        },
    }
}
