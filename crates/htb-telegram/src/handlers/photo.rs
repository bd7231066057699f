use std::sync::Arc;

use teloxide::prelude::*;

use htb_core::{domain::ChatId, messaging::types::PhotoRef};

use crate::router::AppState;

use super::sender;

pub async fn handle_photo(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(photos) = msg.photo() else {
        return Ok(());
    };
    // Sizes are ordered small to large; relay the best one.
    let Some(best) = photos.last() else {
        return Ok(());
    };

    let from = sender(user);
    let photo = PhotoRef(best.file.id.clone());

    if let Err(e) = state
        .router
        .handle_photo(&from, ChatId(msg.chat.id.0), &photo, msg.caption())
        .await
    {
        tracing::warn!(user_id = from.id.0, "photo handling failed: {e}");
        let _ = bot
            .send_message(msg.chat.id, "⚠️ Something went wrong, please try again.")
            .await;
    }

    Ok(())
}
