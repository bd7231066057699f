use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    gateway::ImageAttachment,
    messaging::types::PhotoRef,
    Result,
};

/// Cross-messenger port.
///
/// Telegram is the first implementation; the shape is kept narrow so another
/// transport can fit behind the same interface.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &PhotoRef,
        caption: Option<&str>,
    ) -> Result<MessageRef>;

    async fn forward_message(&self, chat_id: ChatId, msg: MessageRef) -> Result<MessageRef>;

    /// Download the photo bytes behind a handle, with their media type.
    async fn fetch_photo(&self, photo: &PhotoRef) -> Result<ImageAttachment>;
}
