/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a delivered message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl UserId {
    /// The private chat shared with this user (same numeric value on Telegram).
    pub fn as_chat(self) -> ChatId {
        ChatId(self.0)
    }
}

/// A sender identity as observed on an inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Student {
    pub id: UserId,
    pub display_name: Option<String>,
}

impl Student {
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => format!("user {}", self.id.0),
        }
    }
}

/// Teacher/owner identities: receive forwarded homework and may broadcast.
///
/// Loaded once from config at startup and immutable for the rest of the run.
#[derive(Clone, Debug, Default)]
pub struct RecipientSet {
    ids: Vec<UserId>,
}

impl RecipientSet {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        let mut out: Vec<UserId> = Vec::new();
        for id in ids {
            let id = UserId(id);
            if !out.contains(&id) {
                out.push(id);
            }
        }
        Self { ids: out }
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.ids.contains(&user)
    }

    pub fn ids(&self) -> &[UserId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_set_dedupes_and_keeps_order() {
        let set = RecipientSet::new([3, 1, 3, 2, 1]);
        assert_eq!(set.ids(), &[UserId(3), UserId(1), UserId(2)]);
        assert!(set.contains(UserId(2)));
        assert!(!set.contains(UserId(9)));
    }
}
