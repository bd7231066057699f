use std::sync::Arc;

use teloxide::prelude::*;

use htb_core::domain::ChatId;

use crate::router::AppState;

use super::sender;

pub async fn handle_text(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };
    if text.trim().is_empty() {
        return Ok(());
    }

    let from = sender(user);
    if let Err(e) = state
        .router
        .handle_text(&from, ChatId(msg.chat.id.0), text)
        .await
    {
        tracing::warn!(user_id = from.id.0, "text handling failed: {e}");
        let _ = bot
            .send_message(msg.chat.id, "⚠️ Something went wrong, please try again.")
            .await;
    }

    Ok(())
}
