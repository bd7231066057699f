//! Telegram adapter (teloxide).
//!
//! This crate implements the `htb-core` MessagingPort over the Telegram Bot
//! API and hosts the update handlers + polling dispatcher.

use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use teloxide::{net::Download, prelude::*, types::InputFile};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use htb_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    gateway::ImageAttachment,
    messaging::{port::MessagingPort, types::PhotoRef},
    Result,
};

static PHOTO_COUNTER: AtomicUsize = AtomicUsize::new(1);

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
    temp_dir: PathBuf,
}

impl TelegramMessenger {
    pub fn new(bot: Bot, temp_dir: PathBuf) -> Self {
        Self { bot, temp_dir }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Delivery(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| self.bot.send_message(Self::tg_chat(chat_id), text.to_string()))
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &PhotoRef,
        caption: Option<&str>,
    ) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                let mut req = self
                    .bot
                    .send_photo(Self::tg_chat(chat_id), InputFile::file_id(photo.0.clone()));
                if let Some(c) = caption {
                    req = req.caption(c.to_string());
                }
                req
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn forward_message(&self, chat_id: ChatId, msg: MessageRef) -> Result<MessageRef> {
        let fwd = self
            .with_retry(|| {
                self.bot.forward_message(
                    Self::tg_chat(chat_id),
                    Self::tg_chat(msg.chat_id),
                    Self::tg_msg_id(msg.message_id),
                )
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(fwd.id.0),
        })
    }

    async fn fetch_photo(&self, photo: &PhotoRef) -> Result<ImageAttachment> {
        let file = self
            .with_retry(|| self.bot.get_file(photo.0.clone()))
            .await?;

        // Telegram photos come re-encoded as JPEG regardless of the upload.
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let n = PHOTO_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = self.temp_dir.join(format!("photo_{ts}_{n}.jpg"));

        let mut dst = tokio::fs::File::create(&path).await?;
        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .map_err(|e| Error::External(format!("telegram download error: {e}")))?;

        let data = tokio::fs::read(&path).await?;
        let _ = tokio::fs::remove_file(&path).await;

        Ok(ImageAttachment {
            data,
            mime: "image/jpeg".to_string(),
        })
    }
}
