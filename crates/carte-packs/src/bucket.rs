//! Rarity buckets and the two-stage weighted draw.
//!
//! A bucket holds every catalog card of one rarity, partitioned by kind in
//! [`CardKind::ALL`] order. Buckets are built once per opening and walked
//! in rarity-name order, so the same roll always selects the same bucket.

use carte_ledger::CardCatalog;
use carte_types::{CardKind, CardRef, CarteError, PackDefinition, Result};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// The cards of one kind inside a bucket, ascending by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindPartition {
    pub kind: CardKind,
    pub cards: Vec<CardRef>,
}

/// Every drawable card of one weighted rarity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RarityBucket {
    pub rarity: String,
    pub weight: Decimal,
    pub partitions: Vec<KindPartition>,
}

impl RarityBucket {
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.partitions.iter().map(|p| p.cards.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_cards() == 0
    }
}

/// Build one bucket per rarity with weight > 0, sorted by rarity name.
/// Buckets may be empty when the catalog has no card of that rarity.
#[must_use]
pub fn build_buckets(pack: &PackDefinition, catalog: &CardCatalog) -> Vec<RarityBucket> {
    let mut weights: Vec<_> = pack
        .rarity_weights
        .iter()
        .filter(|w| w.weight > Decimal::ZERO)
        .collect();
    weights.sort_by(|a, b| a.rarity.cmp(&b.rarity));

    weights
        .into_iter()
        .map(|w| RarityBucket {
            rarity: w.rarity.clone(),
            weight: w.weight,
            partitions: CardKind::ALL
                .iter()
                .map(|&kind| KindPartition {
                    kind,
                    cards: catalog.ids_with_rarity(&w.rarity, kind),
                })
                .filter(|p| !p.cards.is_empty())
                .collect(),
        })
        .collect()
}

/// Weighted pick among the non-empty buckets.
///
/// Rolls uniformly in `[0, Σ weight]` over the available buckets and
/// returns the first whose cumulative weight reaches the roll.
///
/// # Errors
/// Returns `NoAvailableCards` if no bucket has cards, the available
/// weight is zero, or the weights are too large to sum.
pub fn pick_bucket<'a, R: Rng + ?Sized>(
    buckets: &'a [RarityBucket],
    rng: &mut R,
) -> Result<&'a RarityBucket> {
    let available: Vec<&RarityBucket> = buckets.iter().filter(|b| !b.is_empty()).collect();
    let Some(&last) = available.last() else {
        return Err(CarteError::NoAvailableCards {
            reason: "no cards available for the configured rarities".into(),
        });
    };

    let total = available
        .iter()
        .try_fold(Decimal::ZERO, |sum, b| sum.checked_add(b.weight))
        .ok_or_else(weight_overflow)?;
    if total <= Decimal::ZERO {
        return Err(CarteError::NoAvailableCards {
            reason: "all rarity weights are zero".into(),
        });
    }

    let fraction = Decimal::from_f64(rng.gen_range(0.0..=1.0)).unwrap_or(Decimal::ONE);
    let roll = total.checked_mul(fraction).ok_or_else(weight_overflow)?;

    let mut cumulative = Decimal::ZERO;
    for &bucket in &available {
        cumulative = cumulative.checked_add(bucket.weight).ok_or_else(weight_overflow)?;
        if roll <= cumulative {
            return Ok(bucket);
        }
    }
    // Rounding in `total * fraction` can leave the roll a hair above the sum.
    Ok(last)
}

fn weight_overflow() -> CarteError {
    CarteError::NoAvailableCards {
        reason: "rarity weights overflow".into(),
    }
}

/// Uniform pick of one card across all partitions of a bucket.
///
/// # Errors
/// Returns `NoAvailableCards` if the bucket is empty.
pub fn pick_card<R: Rng + ?Sized>(bucket: &RarityBucket, rng: &mut R) -> Result<CardRef> {
    let total = bucket.total_cards();
    if total == 0 {
        return Err(CarteError::NoAvailableCards {
            reason: format!("no cards available for rarity {}", bucket.rarity),
        });
    }

    let mut index = rng.gen_range(0..total);
    for partition in &bucket.partitions {
        if index < partition.cards.len() {
            return Ok(partition.cards[index]);
        }
        index -= partition.cards.len();
    }
    Err(CarteError::Internal(format!(
        "card index out of range for rarity {}",
        bucket.rarity
    )))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use carte_types::{CardDefinition, CardId, PackId};
    use super::*;

    fn catalog() -> CardCatalog {
        CardCatalog::from_definitions([
            CardDefinition::dummy_player(1, "Rossi", "common"),
            CardDefinition::dummy_player(2, "Bianchi", "common"),
            CardDefinition::dummy_coach(1, "Mister", "common"),
            CardDefinition::dummy_player(3, "Verdi", "rare"),
        ])
        .unwrap()
    }

    fn pack() -> PackDefinition {
        PackDefinition::new(PackId(1), "Basic", 100)
            .with_weight("rare", Decimal::new(10, 0))
            .with_weight("common", Decimal::new(90, 0))
            .with_weight("epic", Decimal::ZERO)
    }

    #[test]
    fn buckets_skip_zero_weights_and_sort_by_name() {
        let buckets = build_buckets(&pack(), &catalog());
        let names: Vec<&str> = buckets.iter().map(|b| b.rarity.as_str()).collect();
        assert_eq!(names, vec!["common", "rare"]);
    }

    #[test]
    fn buckets_partition_by_kind() {
        let buckets = build_buckets(&pack(), &catalog());
        let common = &buckets[0];
        assert_eq!(common.total_cards(), 3);
        assert_eq!(common.partitions.len(), 2);
        assert_eq!(common.partitions[0].kind, CardKind::Player);
        assert_eq!(
            common.partitions[0].cards,
            vec![
                CardRef::new(CardKind::Player, CardId(1)),
                CardRef::new(CardKind::Player, CardId(2)),
            ]
        );
        assert_eq!(common.partitions[1].kind, CardKind::Coach);
    }

    #[test]
    fn empty_buckets_are_excluded_from_the_roll() {
        let pack = PackDefinition::new(PackId(2), "Odd", 1)
            .with_weight("legendary", Decimal::new(99, 0))
            .with_weight("rare", Decimal::ONE);
        let buckets = build_buckets(&pack, &catalog());
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(pick_bucket(&buckets, &mut rng).unwrap().rarity, "rare");
        }
    }

    #[test]
    fn no_cards_anywhere_fails() {
        let pack =
            PackDefinition::new(PackId(3), "Ghost", 1).with_weight("legendary", Decimal::ONE);
        let buckets = build_buckets(&pack, &catalog());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            pick_bucket(&buckets, &mut rng),
            Err(CarteError::NoAvailableCards { .. })
        ));
    }

    #[test]
    fn overflowing_weights_fail_instead_of_panicking() {
        let pack = PackDefinition::new(PackId(4), "Huge", 1)
            .with_weight("common", Decimal::MAX)
            .with_weight("rare", Decimal::MAX);
        let buckets = build_buckets(&pack, &catalog());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            pick_bucket(&buckets, &mut rng),
            Err(CarteError::NoAvailableCards { .. })
        ));
    }

    #[test]
    fn pick_card_covers_every_partition() {
        let buckets = build_buckets(&pack(), &catalog());
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..300 {
            seen.insert(pick_card(&buckets[0], &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3, "every common card should be drawable");
    }

    #[test]
    fn same_seed_same_draws() {
        let buckets = build_buckets(&pack(), &catalog());
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| {
                    let bucket = pick_bucket(&buckets, &mut rng).unwrap();
                    pick_card(bucket, &mut rng).unwrap()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(9), draw(9));
    }
}
