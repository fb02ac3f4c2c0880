//! The shared ledger: account registry, purchase log and catalog handle.
//!
//! Each account sits behind its own mutex, so pack openings by unrelated
//! users never wait on each other. Work that touches two accounts goes
//! through [`Ledger::with_pair`], which locks in ascending `UserId` order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use carte_types::{
    CardRef, CarteError, LedgerConfig, OfferId, OwnershipRecord, PurchaseId, PurchaseOrigin,
    PurchaseRecord, Result, UserId,
};

use crate::{account::Account, catalog::CardCatalog};

/// Lock a mutex, mapping poisoning to [`CarteError::LockPoisoned`].
pub fn lock<'a, T>(mutex: &'a Mutex<T>, what: &'static str) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| CarteError::LockPoisoned(what))
}

/// Thread-safe store of accounts and purchases.
pub struct Ledger {
    catalog: Arc<CardCatalog>,
    config: LedgerConfig,
    accounts: RwLock<HashMap<UserId, Arc<Mutex<Account>>>>,
    /// Append-only, in creation order.
    purchases: Mutex<Vec<PurchaseRecord>>,
}

impl Ledger {
    #[must_use]
    pub fn new(catalog: Arc<CardCatalog>, config: LedgerConfig) -> Self {
        Self {
            catalog,
            config,
            accounts: RwLock::new(HashMap::new()),
            purchases: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // =================================================================
    // Accounts
    // =================================================================

    /// Register a user with the configured starting balance.
    pub fn register_user(&self, username: impl Into<String>) -> Result<UserId> {
        let user_id = UserId::new();
        let account = Account::new(user_id, username, self.config.starting_credits);
        self.accounts
            .write()
            .map_err(|_| CarteError::LockPoisoned("account registry"))?
            .insert(user_id, Arc::new(Mutex::new(account)));
        tracing::debug!(user = %user_id, credits = self.config.starting_credits, "User registered");
        Ok(user_id)
    }

    fn handle(&self, user_id: UserId) -> Result<Arc<Mutex<Account>>> {
        self.accounts
            .read()
            .map_err(|_| CarteError::LockPoisoned("account registry"))?
            .get(&user_id)
            .cloned()
            .ok_or(CarteError::UserNotFound(user_id))
    }

    /// Run `f` with the user's account locked.
    pub fn with_account<R>(
        &self,
        user_id: UserId,
        f: impl FnOnce(&mut Account) -> Result<R>,
    ) -> Result<R> {
        let handle = self.handle(user_id)?;
        let mut account = lock(&handle, "account")?;
        f(&mut *account)
    }

    /// Run `f` with both accounts locked. Locks are taken in ascending
    /// `UserId` order; `f` receives the accounts in argument order.
    ///
    /// # Errors
    /// Returns `Internal` if both ids are the same user.
    pub fn with_pair<R>(
        &self,
        first: UserId,
        second: UserId,
        f: impl FnOnce(&mut Account, &mut Account) -> Result<R>,
    ) -> Result<R> {
        if first == second {
            return Err(CarteError::Internal(format!(
                "pair lock requested twice for {first}"
            )));
        }
        let first_handle = self.handle(first)?;
        let second_handle = self.handle(second)?;

        if first < second {
            let mut a = lock(&first_handle, "account")?;
            let mut b = lock(&second_handle, "account")?;
            f(&mut *a, &mut *b)
        } else {
            let mut b = lock(&second_handle, "account")?;
            let mut a = lock(&first_handle, "account")?;
            f(&mut *a, &mut *b)
        }
    }

    #[must_use]
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.handle(user_id).is_ok()
    }

    pub fn username(&self, user_id: UserId) -> Result<String> {
        self.with_account(user_id, |a| Ok(a.username().to_string()))
    }

    pub fn balance(&self, user_id: UserId) -> Result<u64> {
        self.with_account(user_id, |a| Ok(a.balance()))
    }

    /// Add credits to a user's balance. Returns the new balance.
    pub fn deposit(&self, user_id: UserId, amount: u64) -> Result<u64> {
        self.with_account(user_id, |a| a.credit(amount))
    }

    pub fn copies_owned(&self, user_id: UserId, card: CardRef) -> Result<usize> {
        self.with_account(user_id, |a| Ok(a.copies_of(card)))
    }

    pub fn collection(&self, user_id: UserId) -> Result<Vec<CardRef>> {
        self.with_account(user_id, |a| Ok(a.collection().iter().copied().collect()))
    }

    pub fn ownership_records(&self, user_id: UserId) -> Result<Vec<OwnershipRecord>> {
        self.with_account(user_id, |a| Ok(a.records().to_vec()))
    }

    /// Copies of `card` across every account. Swaps never change it.
    pub fn total_copies(&self, card: CardRef) -> Result<usize> {
        let handles: Vec<_> = self
            .accounts
            .read()
            .map_err(|_| CarteError::LockPoisoned("account registry"))?
            .values()
            .cloned()
            .collect();
        let mut total = 0;
        for handle in handles {
            total += lock(&handle, "account")?.copies_of(card);
        }
        Ok(total)
    }

    // =================================================================
    // Purchases
    // =================================================================

    pub fn append_purchase(&self, record: PurchaseRecord) -> Result<()> {
        lock(&self.purchases, "purchase log")?.push(record);
        Ok(())
    }

    /// A user's purchases, newest first.
    pub fn purchases_for(&self, user_id: UserId) -> Result<Vec<PurchaseRecord>> {
        Ok(lock(&self.purchases, "purchase log")?
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    pub fn purchase(&self, id: PurchaseId) -> Result<Option<PurchaseRecord>> {
        Ok(lock(&self.purchases, "purchase log")?
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    pub fn purchase_count(&self) -> Result<usize> {
        Ok(lock(&self.purchases, "purchase log")?.len())
    }

    // =================================================================
    // Transfers
    // =================================================================

    /// Move one copy of `card` from `from` to `to` on behalf of `offer`.
    ///
    /// The receiver's copy cites a fresh zero-cost `ExchangeTransfer`
    /// purchase and keeps the rarity the copy was originally drawn at.
    /// Both accounts must already be locked by the caller.
    ///
    /// # Errors
    /// Returns `LedgerInconsistency` if `from` holds no copy; nothing is
    /// changed in that case.
    pub fn transfer_copy(
        &self,
        from: &mut Account,
        to: &mut Account,
        card: CardRef,
        offer: OfferId,
    ) -> Result<OwnershipRecord> {
        let rarity = from
            .records_of(card)
            .next()
            .map(|r| r.rarity.clone())
            .ok_or_else(|| CarteError::LedgerInconsistency {
                reason: format!(
                    "unable to locate a copy of {card} held by {} for {offer}",
                    from.user_id()
                ),
            })?;

        let purchase = PurchaseRecord::seal(
            PurchaseId::new(),
            to.user_id(),
            PurchaseOrigin::ExchangeTransfer(offer),
            0,
            &[card],
        );
        let received = OwnershipRecord::new(to.user_id(), purchase.id, card, rarity);
        self.append_purchase(purchase)?;

        from.remove_one_copy(card)?;
        to.insert_copy(received.clone())?;
        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use carte_types::{CardDefinition, CardId, CardKind, PackId};
    use super::*;

    fn ledger() -> Ledger {
        let catalog =
            CardCatalog::from_definitions([CardDefinition::dummy_player(1, "Rossi", "rare")])
                .unwrap();
        Ledger::new(Arc::new(catalog), LedgerConfig::default())
    }

    fn card() -> CardRef {
        CardRef::new(CardKind::Player, CardId(1))
    }

    fn give(ledger: &Ledger, user: UserId, card: CardRef) {
        ledger
            .with_account(user, |a| {
                let purchase = PurchaseRecord::seal(
                    PurchaseId::new(),
                    user,
                    PurchaseOrigin::Pack(PackId(1)),
                    0,
                    &[card],
                );
                let rec = OwnershipRecord::new(user, purchase.id, card, Some("rare".into()));
                a.insert_copy(rec)
            })
            .unwrap();
    }

    #[test]
    fn registration_grants_starting_credits() {
        let ledger = ledger();
        let user = ledger.register_user("ada").unwrap();
        assert_eq!(ledger.balance(user).unwrap(), 500);
        assert_eq!(ledger.username(user).unwrap(), "ada");
    }

    #[test]
    fn unknown_user() {
        let ledger = ledger();
        let err = ledger.balance(UserId::new()).unwrap_err();
        assert!(matches!(err, CarteError::UserNotFound(_)));
    }

    #[test]
    fn deposit_adds_credits() {
        let ledger = ledger();
        let user = ledger.register_user("ada").unwrap();
        assert_eq!(ledger.deposit(user, 25).unwrap(), 525);
    }

    #[test]
    fn pair_lock_passes_accounts_in_argument_order() {
        let ledger = ledger();
        let a = ledger.register_user("a").unwrap();
        let b = ledger.register_user("b").unwrap();
        let (x, y) = ledger
            .with_pair(b, a, |first, second| Ok((first.user_id(), second.user_id())))
            .unwrap();
        assert_eq!((x, y), (b, a));
    }

    #[test]
    fn pair_lock_rejects_same_user() {
        let ledger = ledger();
        let a = ledger.register_user("a").unwrap();
        assert!(ledger.with_pair(a, a, |_, _| Ok(())).is_err());
    }

    #[test]
    fn transfer_moves_exactly_one_copy() {
        let ledger = ledger();
        let a = ledger.register_user("a").unwrap();
        let b = ledger.register_user("b").unwrap();
        give(&ledger, a, card());
        give(&ledger, a, card());

        let offer = OfferId::new();
        let received = ledger
            .with_pair(a, b, |from, to| ledger.transfer_copy(from, to, card(), offer))
            .unwrap();

        assert_eq!(received.owner, b);
        assert_eq!(received.rarity.as_deref(), Some("rare"));
        assert_eq!(ledger.copies_owned(a, card()).unwrap(), 1);
        assert_eq!(ledger.copies_owned(b, card()).unwrap(), 1);
        assert_eq!(ledger.total_copies(card()).unwrap(), 2);

        let purchases = ledger.purchases_for(b).unwrap();
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].origin, PurchaseOrigin::ExchangeTransfer(offer));
        assert_eq!(purchases[0].cost, 0);
        assert_eq!(purchases[0].id, received.purchase_id);
    }

    #[test]
    fn transfer_without_copy_changes_nothing() {
        let ledger = ledger();
        let a = ledger.register_user("a").unwrap();
        let b = ledger.register_user("b").unwrap();
        let err = ledger
            .with_pair(a, b, |from, to| ledger.transfer_copy(from, to, card(), OfferId::new()))
            .unwrap_err();
        assert!(matches!(err, CarteError::LedgerInconsistency { .. }));
        assert_eq!(ledger.purchase_count().unwrap(), 0);
        assert!(ledger.collection(b).unwrap().is_empty());
    }
}
