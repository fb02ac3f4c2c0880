//! Ledger integration tests: concurrent account access and copy conservation.

use std::sync::Arc;
use std::thread;

use carte_ledger::{CardCatalog, Ledger};
use carte_types::*;

fn ledger(starting_credits: u64) -> Ledger {
    let catalog = CardCatalog::from_definitions([
        CardDefinition::dummy_player(1, "Rossi", "common"),
        CardDefinition::dummy_player(2, "Verdi", "rare"),
    ])
    .expect("catalog should build");
    Ledger::new(Arc::new(catalog), LedgerConfig { starting_credits })
}

fn grant(ledger: &Ledger, user: UserId, card: CardRef, copies: usize) {
    ledger
        .with_account(user, |account| {
            for _ in 0..copies {
                let purchase = PurchaseRecord::seal(
                    PurchaseId::new(),
                    user,
                    PurchaseOrigin::Pack(PackId(1)),
                    0,
                    &[card],
                );
                account.insert_copy(OwnershipRecord::new(
                    user,
                    purchase.id,
                    card,
                    Some("common".into()),
                ))?;
            }
            Ok(())
        })
        .expect("grant should succeed");
}

// =========================================================================
// Credits
// =========================================================================

#[test]
fn concurrent_debits_never_overdraw() {
    let ledger = ledger(100);
    let user = ledger.register_user("ada").unwrap();

    let outcomes: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| ledger.with_account(user, |a| a.debit(30))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let ok = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 3, "100 credits cover exactly three 30-credit debits");
    assert!(outcomes.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
        e,
        CarteError::InsufficientCredits {
            needed: 30,
            available: 10
        }
    )));
    assert_eq!(ledger.balance(user).unwrap(), 10);
}

#[test]
fn concurrent_deposits_all_land() {
    let ledger = ledger(0);
    let user = ledger.register_user("ada").unwrap();
    thread::scope(|s| {
        for _ in 0..16 {
            s.spawn(|| ledger.deposit(user, 5).unwrap());
        }
    });
    assert_eq!(ledger.balance(user).unwrap(), 80);
}

// =========================================================================
// Transfers
// =========================================================================

#[test]
fn opposing_pair_locks_do_not_deadlock_and_conserve_copies() {
    let ledger = ledger(0);
    let a = ledger.register_user("a").unwrap();
    let b = ledger.register_user("b").unwrap();
    let card = CardRef::new(CardKind::Player, CardId(1));
    grant(&ledger, a, card, 50);
    grant(&ledger, b, card, 50);

    thread::scope(|s| {
        for i in 0..40 {
            let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
            let ledger = &ledger;
            s.spawn(move || {
                ledger
                    .with_pair(from, to, |src, dst| {
                        ledger.transfer_copy(src, dst, card, OfferId::new())
                    })
                    .unwrap();
            });
        }
    });

    assert_eq!(ledger.total_copies(card).unwrap(), 100);
    assert_eq!(ledger.copies_owned(a, card).unwrap(), 50);
    assert_eq!(ledger.copies_owned(b, card).unwrap(), 50);
    // One zero-cost transfer purchase per move.
    assert_eq!(ledger.purchase_count().unwrap(), 40);
}

#[test]
fn giving_away_the_last_copy_prunes_the_collection() {
    let ledger = ledger(0);
    let a = ledger.register_user("a").unwrap();
    let b = ledger.register_user("b").unwrap();
    let card = CardRef::new(CardKind::Player, CardId(2));
    grant(&ledger, a, card, 1);

    ledger
        .with_pair(a, b, |src, dst| ledger.transfer_copy(src, dst, card, OfferId::new()))
        .unwrap();

    assert!(ledger.collection(a).unwrap().is_empty());
    assert_eq!(ledger.collection(b).unwrap(), vec![card]);
    let records = ledger.ownership_records(b).unwrap();
    assert_eq!(records[0].rarity.as_deref(), Some("common"));
}
