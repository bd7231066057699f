use std::sync::Arc;

use crate::{
    broadcast::broadcast,
    domain::{ChatId, RecipientSet, Student, UserId},
    errors::Error,
    gateway::{AiProvider, AiRequest},
    messaging::{
        port::MessagingPort,
        types::{Outgoing, PhotoRef},
    },
    roster::StudentRoster,
    session::SessionStore,
    utils::{AuditEvent, AuditLogger},
    Result,
};

/// Instruction prefixed to a text problem routed to the gateway.
pub const TEXT_CHECK_PREFIX: &str = "Solve and explain: ";

/// Instruction sent alongside a photo routed to the gateway.
pub const PHOTO_CHECK_INSTRUCTION: &str =
    "Solve the problem in this image and explain the steps.";

const CHECK_ARMED: &str =
    "Check mode armed. Send the problem as text or a photo and I'll check it.";
const IDLE_TEXT_HINT: &str =
    "Send /check to have your next message checked, or send a photo to submit homework.";
const NO_TEACHERS: &str =
    "⚠️ No teachers are configured, so your homework could not be delivered.";
const BROADCAST_USAGE: &str = "Usage: /broadcast <message>";
const NO_STUDENTS: &str = "No students recorded yet.";

/// Routes each inbound message by the sender's session state.
///
/// Unprompted text never reaches the gateway: the sender gets a usage hint
/// instead. Only `/check` arms a (single) gateway call, and the flag is
/// consumed before the call, so a failed check never leaves a user armed.
pub struct Router {
    sessions: Arc<SessionStore>,
    roster: Arc<StudentRoster>,
    teachers: RecipientSet,
    gateway: Arc<dyn AiProvider>,
    messenger: Arc<dyn MessagingPort>,
    audit: Arc<AuditLogger>,
}

impl Router {
    pub fn new(
        sessions: Arc<SessionStore>,
        roster: Arc<StudentRoster>,
        teachers: RecipientSet,
        gateway: Arc<dyn AiProvider>,
        messenger: Arc<dyn MessagingPort>,
        audit: Arc<AuditLogger>,
    ) -> Self {
        Self {
            sessions,
            roster,
            teachers,
            gateway,
            messenger,
            audit,
        }
    }

    /// `/check`: arm check mode for the sender's next message.
    pub async fn start_check(&self, from: &Student, chat: ChatId) -> Result<()> {
        self.sessions.set_checking(from.id).await;
        self.messenger.send_text(chat, CHECK_ARMED).await?;
        Ok(())
    }

    pub async fn handle_text(&self, from: &Student, chat: ChatId, text: &str) -> Result<()> {
        if self.sessions.consume_checking(from.id).await {
            let outcome = self.check_text(text).await;
            return self.reply_check(from, chat, "TEXT_CHECK", text, outcome).await;
        }

        self.messenger.send_text(chat, IDLE_TEXT_HINT).await?;
        Ok(())
    }

    pub async fn handle_photo(
        &self,
        from: &Student,
        chat: ChatId,
        photo: &PhotoRef,
        caption: Option<&str>,
    ) -> Result<()> {
        if self.sessions.consume_checking(from.id).await {
            let outcome = self.check_photo(photo, caption).await;
            let content = caption.unwrap_or("[photo]");
            return self
                .reply_check(from, chat, "PHOTO_CHECK", content, outcome)
                .await;
        }

        self.forward_submission(from, chat, photo, caption).await
    }

    /// `/broadcast <text>` (teachers only): fan a message out to the roster.
    pub async fn broadcast_text(&self, from: &Student, chat: ChatId, text: &str) -> Result<()> {
        if let Err(err) = self.authorize(from.id) {
            self.write_audit(AuditEvent::auth(from.id.0, &from.label(), "broadcast", false));
            self.messenger.send_text(chat, &format!("⛔ {err}")).await?;
            return Ok(());
        }

        let text = text.trim();
        if text.is_empty() {
            self.messenger.send_text(chat, BROADCAST_USAGE).await?;
            return Ok(());
        }

        let recipients = self.roster.ids().await;
        if recipients.is_empty() {
            self.messenger.send_text(chat, NO_STUDENTS).await?;
            return Ok(());
        }

        let report = broadcast(
            self.messenger.as_ref(),
            &Outgoing::Text(text.to_string()),
            &recipients,
        )
        .await;
        self.write_audit(AuditEvent::broadcast(
            from.id.0,
            &from.label(),
            report.attempted,
            report.succeeded,
            report.failed.iter().map(|u| u.0).collect(),
        ));

        self.messenger
            .send_text(chat, &format!("📣 Broadcast {}", report.summary()))
            .await?;
        Ok(())
    }

    /// `/students` (teachers only): list the recorded roster.
    pub async fn list_students(&self, from: &Student, chat: ChatId) -> Result<()> {
        if let Err(err) = self.authorize(from.id) {
            self.write_audit(AuditEvent::auth(from.id.0, &from.label(), "students", false));
            self.messenger.send_text(chat, &format!("⛔ {err}")).await?;
            return Ok(());
        }

        let students = self.roster.list().await;
        if students.is_empty() {
            self.messenger.send_text(chat, NO_STUDENTS).await?;
            return Ok(());
        }

        let mut out = format!("Recorded students ({}):", students.len());
        for s in &students {
            out.push_str(&format!("\n- {} ({})", s.label(), s.id.0));
        }
        self.messenger.send_text(chat, &out).await?;
        Ok(())
    }

    fn authorize(&self, user: UserId) -> Result<()> {
        if self.teachers.contains(user) {
            return Ok(());
        }
        Err(Error::Unauthorized(user.0))
    }

    async fn check_text(&self, text: &str) -> Result<String> {
        let req = AiRequest::text(format!("{TEXT_CHECK_PREFIX}{text}"))?;
        Ok(self.gateway.complete(&req).await?)
    }

    async fn check_photo(&self, photo: &PhotoRef, caption: Option<&str>) -> Result<String> {
        let attachment = self.messenger.fetch_photo(photo).await?;
        let prompt = match caption {
            Some(c) if !c.trim().is_empty() => format!("{PHOTO_CHECK_INSTRUCTION}\n\n{c}"),
            _ => PHOTO_CHECK_INSTRUCTION.to_string(),
        };
        let req = AiRequest::with_image(prompt, attachment)?;
        Ok(self.gateway.complete(&req).await?)
    }

    async fn reply_check(
        &self,
        from: &Student,
        chat: ChatId,
        kind: &str,
        content: &str,
        outcome: Result<String>,
    ) -> Result<()> {
        match outcome {
            Ok(answer) => {
                self.write_audit(AuditEvent::message(
                    from.id.0,
                    &from.label(),
                    kind,
                    content,
                    Some(&answer),
                ));
                self.messenger.send_text(chat, &answer).await?;
            }
            Err(err) => {
                self.write_audit(AuditEvent::error(
                    from.id.0,
                    &from.label(),
                    &err.to_string(),
                    Some(kind),
                ));
                self.messenger.send_text(chat, &format!("⚠️ {err}")).await?;
            }
        }
        Ok(())
    }

    async fn forward_submission(
        &self,
        from: &Student,
        chat: ChatId,
        photo: &PhotoRef,
        caption: Option<&str>,
    ) -> Result<()> {
        if self.roster.record(from.clone()).await {
            tracing::info!(user_id = from.id.0, "new student recorded");
        }

        if self.teachers.is_empty() {
            self.messenger.send_text(chat, NO_TEACHERS).await?;
            return Ok(());
        }

        let forwarded_caption = match caption {
            Some(c) if !c.trim().is_empty() => format!("Homework from {}: {c}", from.label()),
            _ => format!("Homework from {}", from.label()),
        };
        let body = Outgoing::Photo {
            photo: photo.clone(),
            caption: Some(forwarded_caption),
        };

        let report = broadcast(self.messenger.as_ref(), &body, self.teachers.ids()).await;
        self.write_audit(AuditEvent::message(
            from.id.0,
            &from.label(),
            "SUBMISSION",
            caption.unwrap_or(""),
            Some(&report.summary()),
        ));

        let confirmation = if report.succeeded == 0 {
            format!("⚠️ Homework not delivered: {}", report.summary())
        } else {
            format!("📨 Homework {}", report.summary())
        };
        self.messenger.send_text(chat, &confirmation).await?;
        Ok(())
    }

    fn write_audit(&self, event: AuditEvent) {
        if let Err(e) = self.audit.write(event) {
            tracing::warn!("audit write failed: {e}");
        }
    }
}
