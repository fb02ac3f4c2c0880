//! Notification sink and the in-memory inbox behind it.

use std::sync::Mutex;

use carte_types::{
    CarteError, ExchangeNotification, NotificationDraft, NotificationId, Result, UserId,
};

use crate::ledger::lock;

/// Where the exchange engine reports completed trades.
///
/// Delivery is fire-and-forget from the engine's point of view: the engine
/// never reads notifications back.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, batch: Vec<NotificationDraft>) -> Result<()>;
}

/// Stores notifications and serves the read/dismiss surface.
#[derive(Debug, Default)]
pub struct NotificationInbox {
    /// In creation order.
    entries: Mutex<Vec<ExchangeNotification>>,
}

impl NotificationInbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unread notifications for a user, newest first.
    pub fn unread_for(&self, user_id: UserId) -> Result<Vec<ExchangeNotification>> {
        Ok(lock(&self.entries, "notification inbox")?
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .cloned()
            .collect())
    }

    /// Every notification for a user (read or not), newest first.
    pub fn all_for(&self, user_id: UserId) -> Result<Vec<ExchangeNotification>> {
        Ok(lock(&self.entries, "notification inbox")?
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    /// Mark the given notifications read. Ids that belong to other users
    /// are ignored. Returns how many were updated.
    ///
    /// # Errors
    /// Returns `EmptyNotificationIds` if `ids` is empty.
    pub fn mark_read(&self, user_id: UserId, ids: &[NotificationId]) -> Result<usize> {
        if ids.is_empty() {
            return Err(CarteError::EmptyNotificationIds);
        }
        let mut entries = lock(&self.entries, "notification inbox")?;
        let mut updated = 0;
        for n in entries
            .iter_mut()
            .filter(|n| n.user_id == user_id && ids.contains(&n.id))
        {
            if !n.is_read {
                n.is_read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(lock(&self.entries, "notification inbox")?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl NotificationSink for NotificationInbox {
    fn deliver(&self, batch: Vec<NotificationDraft>) -> Result<()> {
        let mut entries = lock(&self.entries, "notification inbox")?;
        entries.extend(batch.into_iter().map(ExchangeNotification::from));
        Ok(())
    }
}
