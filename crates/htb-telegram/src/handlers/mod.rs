//! Telegram update handlers.
//!
//! Each handler is a small adapter that extracts the sender and payload from
//! the teloxide update and calls into the `htb-core` router. Routing policy
//! (check mode, forwarding, authorization) lives entirely in core.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use htb_core::domain::{Student, UserId};

use crate::router::AppState;

mod commands;
mod photo;
mod text;

pub(crate) fn sender(user: &teloxide::types::User) -> Student {
    let display_name = user
        .username
        .clone()
        .or_else(|| Some(user.first_name.clone()))
        .filter(|s| !s.trim().is_empty());

    Student {
        id: UserId(user.id.0 as i64),
        display_name,
    }
}

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            return commands::handle_command(bot, msg, state).await;
        }
        return text::handle_text(bot, msg, state).await;
    }

    if msg.photo().is_some() {
        return photo::handle_photo(bot, msg, state).await;
    }

    // Other payload kinds (voice, documents, stickers) are not relayed.
    let _ = bot
        .send_message(msg.chat.id, "Send text or a photo of your homework.")
        .await;

    Ok(())
}
