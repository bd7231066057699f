use std::sync::Arc;

use teloxide::prelude::*;

use htb_core::domain::ChatId;

use crate::router::AppState;

use super::sender;

const WELCOME: &str = "Hi! Send a photo of your homework to submit it to the teacher, \
or use /check to have the next problem checked.";
const UNKNOWN: &str = "Unknown command. Try /check, /broadcast or /students.";

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub async fn handle_command(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let (cmd, args) = parse_command(text);
    let from = sender(user);
    let chat = ChatId(msg.chat.id.0);

    let result = match cmd.as_str() {
        "start" | "help" => {
            let _ = bot.send_message(msg.chat.id, WELCOME).await;
            Ok(())
        }
        "check" => state.router.start_check(&from, chat).await,
        "broadcast" => state.router.broadcast_text(&from, chat, &args).await,
        "students" => state.router.list_students(&from, chat).await,
        _ => {
            let _ = bot.send_message(msg.chat.id, UNKNOWN).await;
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::warn!(user_id = from.id.0, command = %cmd, "command failed: {e}");
    }

    Ok(())
}
