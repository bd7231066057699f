use crate::{
    domain::UserId,
    messaging::{port::MessagingPort, types::Outgoing},
};

/// Outcome of one fan-out invocation. Produced fresh per call, not retained.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: Vec<UserId>,
}

impl BroadcastReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }

    /// Caller-facing one-liner, e.g. "delivered to 4 of 5 recipients".
    pub fn summary(&self) -> String {
        if self.attempted == 0 {
            return "no recipients available".to_string();
        }
        if self.all_delivered() {
            return format!("delivered to all {} recipients", self.attempted);
        }
        format!(
            "delivered to {} of {} recipients ({} failed)",
            self.succeeded,
            self.attempted,
            self.failed.len()
        )
    }
}

/// Deliver `body` to each recipient independently.
///
/// Deliveries run sequentially; a failure for one recipient never aborts the
/// rest. Each recipient gets at most one attempt per call.
pub async fn broadcast(
    port: &dyn MessagingPort,
    body: &Outgoing,
    recipients: &[UserId],
) -> BroadcastReport {
    let mut report = BroadcastReport {
        attempted: recipients.len(),
        ..Default::default()
    };

    for &user in recipients {
        let chat = user.as_chat();
        let sent = match body {
            Outgoing::Text(text) => port.send_text(chat, text).await.map(|_| ()),
            Outgoing::Photo { photo, caption } => port
                .send_photo(chat, photo, caption.as_deref())
                .await
                .map(|_| ()),
        };

        match sent {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                tracing::warn!(user_id = user.0, "broadcast delivery failed: {e}");
                report.failed.push(user);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        domain::{ChatId, MessageId, MessageRef},
        errors::Error,
        gateway::ImageAttachment,
        messaging::types::PhotoRef,
        Result,
    };

    /// Messenger fake that rejects deliveries to the listed chats.
    #[derive(Default)]
    struct FlakyMessenger {
        refuse: Vec<i64>,
        sends: Mutex<Vec<(i64, String)>>,
        photo_sends: Mutex<Vec<(i64, String)>>,
    }

    impl FlakyMessenger {
        fn refusing(refuse: Vec<i64>) -> Self {
            Self {
                refuse,
                ..Default::default()
            }
        }

        fn check(&self, chat_id: ChatId) -> Result<MessageRef> {
            if self.refuse.contains(&chat_id.0) {
                return Err(Error::Delivery(format!("chat {} unreachable", chat_id.0)));
            }
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }
    }

    #[async_trait]
    impl MessagingPort for FlakyMessenger {
        async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
            let r = self.check(chat_id)?;
            self.sends.lock().unwrap().push((chat_id.0, text.to_string()));
            Ok(r)
        }

        async fn send_photo(
            &self,
            chat_id: ChatId,
            photo: &PhotoRef,
            _caption: Option<&str>,
        ) -> Result<MessageRef> {
            let r = self.check(chat_id)?;
            self.photo_sends
                .lock()
                .unwrap()
                .push((chat_id.0, photo.0.clone()));
            Ok(r)
        }

        async fn forward_message(&self, chat_id: ChatId, _msg: MessageRef) -> Result<MessageRef> {
            self.check(chat_id)
        }

        async fn fetch_photo(&self, _photo: &PhotoRef) -> Result<ImageAttachment> {
            Ok(ImageAttachment {
                data: vec![0xff],
                mime: "image/jpeg".to_string(),
            })
        }
    }

    fn users(ids: &[i64]) -> Vec<UserId> {
        ids.iter().map(|&i| UserId(i)).collect()
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_batch() {
        let port = FlakyMessenger::refusing(vec![3]);
        let report = broadcast(
            &port,
            &Outgoing::Text("hello".to_string()),
            &users(&[1, 2, 3, 4, 5]),
        )
        .await;

        assert_eq!(report.attempted, 5);
        assert_eq!(report.succeeded, 4);
        assert_eq!(report.failed, vec![UserId(3)]);
        assert_eq!(port.sends.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn empty_recipient_list_reports_zero_attempts() {
        let port = FlakyMessenger::default();
        let report = broadcast(&port, &Outgoing::Text("hello".to_string()), &[]).await;
        assert_eq!(report.attempted, 0);
        assert_eq!(report.summary(), "no recipients available");
    }

    #[tokio::test]
    async fn photo_bodies_fan_out_with_the_same_accounting() {
        let port = FlakyMessenger::refusing(vec![2]);
        let body = Outgoing::Photo {
            photo: PhotoRef("file-abc".to_string()),
            caption: Some("Homework from ann".to_string()),
        };
        let report = broadcast(&port, &body, &users(&[1, 2])).await;

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, vec![UserId(2)]);
        assert_eq!(
            port.photo_sends.lock().unwrap()[0],
            (1, "file-abc".to_string())
        );
    }

    #[test]
    fn summary_wording() {
        let full = BroadcastReport {
            attempted: 2,
            succeeded: 2,
            failed: vec![],
        };
        assert_eq!(full.summary(), "delivered to all 2 recipients");

        let partial = BroadcastReport {
            attempted: 5,
            succeeded: 4,
            failed: vec![UserId(3)],
        };
        assert_eq!(
            partial.summary(),
            "delivered to 4 of 5 recipients (1 failed)"
        );
    }
}
