//! A scripted session: every player spends their credits on the cheapest
//! pack, then offers each duplicate they pulled. A free pack is opened once.

use std::sync::Arc;

use carte_exchange::{ExchangeEngine, PublishOutcome};
use carte_ledger::{CardCatalog, Ledger, NotificationInbox};
use carte_packs::{PackOpening, PackShop};
use carte_types::{CarteConfig, CarteError, ExchangeNotification, Result};
use rand::Rng;
use serde::Serialize;

use crate::world::World;

#[derive(Debug, Serialize)]
pub struct PlayerReport {
    pub username: String,
    pub openings: Vec<PackOpening>,
    pub offers: Vec<PublishOutcome>,
    pub notifications: Vec<ExchangeNotification>,
    pub final_credits: u64,
    pub distinct_cards: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub players: Vec<PlayerReport>,
    pub completed_trades: usize,
}

pub fn run_session<R: Rng + ?Sized>(
    world: World,
    config: &CarteConfig,
    rng: &mut R,
) -> Result<SessionReport> {
    let catalog = CardCatalog::from_definitions(world.cards)?;
    let ledger = Arc::new(Ledger::new(Arc::new(catalog), config.ledger.clone()));
    let shop = PackShop::from_packs(world.packs)?;
    let inbox = Arc::new(NotificationInbox::new());
    let exchange = ExchangeEngine::new(ledger.clone(), inbox.clone(), config.exchange.clone());

    let users = world
        .players
        .iter()
        .map(|name| ledger.register_user(name.as_str()).map(|id| (id, name.clone())))
        .collect::<Result<Vec<_>>>()?;

    let (cheapest, price) = shop
        .active_packs()
        .first()
        .map(|p| (p.id, p.price))
        .ok_or_else(|| CarteError::Configuration("no active pack on sale".into()))?;

    let mut reports = Vec::with_capacity(users.len());
    for (user, username) in &users {
        let mut openings = Vec::new();
        loop {
            match shop.open_pack_for_user(&ledger, *user, cheapest, rng) {
                Ok(opening) => openings.push(opening),
                Err(CarteError::InsufficientCredits { .. }) => break,
                Err(e) => return Err(e),
            }
            // A free pack never exhausts credits.
            if price == 0 {
                break;
            }
        }
        reports.push(PlayerReport {
            username: username.clone(),
            openings,
            offers: Vec::new(),
            notifications: Vec::new(),
            final_credits: 0,
            distinct_cards: 0,
        });
    }

    let mut completed_trades = 0;
    for ((user, _), report) in users.iter().zip(reports.iter_mut()) {
        for card in ledger.collection(*user)? {
            match exchange.publish_offer(*user, card.kind.label(), card.id, None) {
                Ok(outcome) => {
                    completed_trades += usize::from(outcome.match_result.is_some());
                    report.offers.push(outcome);
                }
                Err(CarteError::NoSpareCopy { .. } | CarteError::CardNotOwned(_)) => {}
                Err(e) => return Err(e),
            }
        }
    }

    for ((user, _), report) in users.iter().zip(reports.iter_mut()) {
        report.notifications = inbox.unread_for(*user)?;
        report.final_credits = ledger.balance(*user)?;
        report.distinct_cards = ledger.collection(*user)?.len();
    }

    tracing::info!(players = users.len(), completed_trades, "Session finished");
    Ok(SessionReport {
        players: reports,
        completed_trades,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal::Decimal;

    use carte_types::{PackDefinition, PackId};
    use super::*;

    #[test]
    fn players_spend_down_to_below_the_cheapest_pack() {
        let mut rng = StdRng::seed_from_u64(5);
        let report = run_session(World::builtin(), &CarteConfig::default(), &mut rng).unwrap();

        assert_eq!(report.players.len(), 3);
        for player in &report.players {
            assert_eq!(player.openings.len(), 5);
            assert_eq!(player.final_credits, 0);
            assert!(player.distinct_cards > 0);
        }
    }

    #[test]
    fn every_trade_notifies_both_sides() {
        let mut rng = StdRng::seed_from_u64(17);
        let report = run_session(World::builtin(), &CarteConfig::default(), &mut rng).unwrap();
        let notices: usize = report.players.iter().map(|p| p.notifications.len()).sum();
        assert_eq!(notices, report.completed_trades * 2);
    }

    #[test]
    fn free_cheapest_pack_is_opened_once_per_player() {
        let mut world = World::builtin();
        world.packs.push(
            PackDefinition::new(PackId(9), "Omaggio", 0)
                .with_cards_per_pack(1)
                .with_weight("common", Decimal::ONE),
        );
        let mut rng = StdRng::seed_from_u64(3);
        let report = run_session(world, &CarteConfig::default(), &mut rng).unwrap();

        for player in &report.players {
            assert_eq!(player.openings.len(), 1);
            assert_eq!(player.openings[0].purchase.cost, 0);
            assert_eq!(player.final_credits, CarteConfig::default().ledger.starting_credits);
        }
    }

    #[test]
    fn world_without_active_packs_is_a_configuration_error() {
        let mut world = World::builtin();
        world.packs.retain(|_| false);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            run_session(world, &CarteConfig::default(), &mut rng),
            Err(CarteError::Configuration(_))
        ));
    }
}
