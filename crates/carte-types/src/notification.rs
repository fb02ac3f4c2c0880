//! Exchange notifications delivered to the two parties of a completed swap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{NotificationId, UserId};

/// A notification as handed to a sink: target user, title and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeNotification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationDraft> for ExchangeNotification {
    fn from(draft: NotificationDraft) -> Self {
        Self {
            id: NotificationId::new(),
            user_id: draft.user_id,
            title: draft.title,
            message: draft.message,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
