//! Per-user account row: credit balance, owned copies and collection index.
//!
//! An `Account` is the unit of row locking. Every mutation either fully
//! succeeds or leaves the account unchanged: checks run before the first
//! write.

use std::collections::BTreeSet;

use carte_types::{CardRef, CarteError, OwnershipRecord, Result, UserId};

/// One user's credits and copies.
#[derive(Debug, Clone)]
pub struct Account {
    user_id: UserId,
    username: String,
    credits: u64,
    /// One row per physical copy, in acquisition order.
    copies: Vec<OwnershipRecord>,
    /// Distinct cards the user holds at least one copy of.
    collection: BTreeSet<CardRef>,
}

impl Account {
    #[must_use]
    pub fn new(user_id: UserId, username: impl Into<String>, credits: u64) -> Self {
        Self {
            user_id,
            username: username.into(),
            credits,
            copies: Vec::new(),
            collection: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    // =================================================================
    // Credits
    // =================================================================

    #[must_use]
    pub fn balance(&self) -> u64 {
        self.credits
    }

    /// Ensure the balance covers `amount` without touching it.
    ///
    /// # Errors
    /// Returns `InsufficientCredits` if balance < amount.
    pub fn ensure_funds(&self, amount: u64) -> Result<()> {
        if self.credits < amount {
            return Err(CarteError::InsufficientCredits {
                needed: amount,
                available: self.credits,
            });
        }
        Ok(())
    }

    /// Debit credits. The balance never goes negative.
    ///
    /// # Errors
    /// Returns `InsufficientCredits` if balance < amount.
    pub fn debit(&mut self, amount: u64) -> Result<u64> {
        self.ensure_funds(amount)?;
        self.credits -= amount;
        Ok(self.credits)
    }

    /// Credit the balance (quiz rewards, refunds, admin grants).
    ///
    /// # Errors
    /// Returns `CreditOverflow` if the balance would exceed `u64::MAX`.
    pub fn credit(&mut self, amount: u64) -> Result<u64> {
        self.credits = self
            .credits
            .checked_add(amount)
            .ok_or(CarteError::CreditOverflow)?;
        Ok(self.credits)
    }

    // =================================================================
    // Ownership
    // =================================================================

    /// Number of copies of `card` held.
    #[must_use]
    pub fn copies_of(&self, card: CardRef) -> usize {
        self.copies.iter().filter(|r| r.card == card).count()
    }

    #[must_use]
    pub fn holds(&self, card: CardRef) -> bool {
        self.copies.iter().any(|r| r.card == card)
    }

    pub fn records_of(&self, card: CardRef) -> impl Iterator<Item = &OwnershipRecord> {
        self.copies.iter().filter(move |r| r.card == card)
    }

    #[must_use]
    pub fn records(&self) -> &[OwnershipRecord] {
        &self.copies
    }

    /// Distinct cards held, ordered by kind then id.
    #[must_use]
    pub fn collection(&self) -> &BTreeSet<CardRef> {
        &self.collection
    }

    /// Add one copy.
    ///
    /// # Errors
    /// Returns `Internal` if the record names a different owner.
    pub fn insert_copy(&mut self, record: OwnershipRecord) -> Result<()> {
        if record.owner != self.user_id {
            return Err(CarteError::Internal(format!(
                "copy {} belongs to {}, not {}",
                record.id, record.owner, self.user_id
            )));
        }
        self.collection.insert(record.card);
        self.copies.push(record);
        Ok(())
    }

    /// Remove exactly one copy of `card` (the oldest), pruning the
    /// collection index when it was the last one.
    ///
    /// # Errors
    /// Returns `LedgerInconsistency` if no copy is held.
    pub fn remove_one_copy(&mut self, card: CardRef) -> Result<OwnershipRecord> {
        let idx = self
            .copies
            .iter()
            .position(|r| r.card == card)
            .ok_or_else(|| CarteError::LedgerInconsistency {
                reason: format!("{} holds no copy of {card}", self.user_id),
            })?;
        let record = self.copies.remove(idx);
        if !self.holds(card) {
            self.collection.remove(&card);
        }
        Ok(record)
    }
}
