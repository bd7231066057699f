use std::collections::HashMap;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::domain::UserId;

/// Per-user check-mode state.
///
/// At most one pending check per user: arming an armed user only refreshes
/// the timestamp. `consume_checking` is a single locked read-and-clear, so
/// two racing messages from the same user consume one flag exactly once.
pub struct SessionStore {
    ttl: Duration,
    pending: Mutex<HashMap<UserId, Instant>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Mark the user as awaiting a check. Idempotent, no error conditions.
    pub async fn set_checking(&self, user: UserId) {
        self.set_checking_at(user, Instant::now()).await;
    }

    pub async fn set_checking_at(&self, user: UserId, now: Instant) {
        self.pending.lock().await.insert(user, now);
    }

    /// Return whether the user was awaiting a check and clear the flag.
    ///
    /// A flag older than the TTL has lapsed and consumes as `false`.
    pub async fn consume_checking(&self, user: UserId) -> bool {
        self.consume_checking_at(user, Instant::now()).await
    }

    pub async fn consume_checking_at(&self, user: UserId, now: Instant) -> bool {
        let Some(set_at) = self.pending.lock().await.remove(&user) else {
            return false;
        };
        now.duration_since(set_at) <= self.ttl
    }
}
