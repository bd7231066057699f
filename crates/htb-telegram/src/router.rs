use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use htb_core::{
    config::Config,
    domain::RecipientSet,
    gateway::AiProvider,
    messaging::port::MessagingPort,
    roster::StudentRoster,
    router::Router,
    session::SessionStore,
    utils::AuditLogger,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub router: Arc<Router>,
}

pub async fn run_polling(cfg: Arc<Config>, gateway: Arc<dyn AiProvider>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    if let Ok(me) = bot.get_me().await {
        tracing::info!("homework bot started: @{}", me.username());
    }
    tracing::info!(teachers = cfg.teacher_ids.len(), "teacher allow-list loaded");

    let messenger: Arc<dyn MessagingPort> =
        Arc::new(TelegramMessenger::new(bot.clone(), cfg.temp_dir.clone()));

    let router = Arc::new(Router::new(
        Arc::new(SessionStore::new(cfg.check_ttl)),
        Arc::new(StudentRoster::new()),
        RecipientSet::new(cfg.teacher_ids.iter().copied()),
        gateway,
        messenger,
        Arc::new(AuditLogger::new(
            cfg.audit_log_path.clone(),
            cfg.audit_log_json,
        )),
    ));

    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        router,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
