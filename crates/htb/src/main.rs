use std::sync::Arc;

use htb_core::{config::Config, gateway::AiProvider};
use htb_openai::OpenAiProvider;

#[tokio::main]
async fn main() -> Result<(), htb_core::Error> {
    htb_core::logging::init("htb");

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!("startup failed: {e}");
            return Err(e);
        }
    };

    let gateway: Arc<dyn AiProvider> = Arc::new(OpenAiProvider::new(&cfg.ai));

    htb_telegram::router::run_polling(cfg, gateway)
        .await
        .map_err(|e| htb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
