use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, gateway::ProviderKind, Result};

/// Typed configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    pub teacher_ids: Vec<i64>,

    // AI gateway
    pub ai: AiConfig,

    // Check-mode flags lapse after this long if never consumed.
    pub check_ttl: Duration,

    // Runtime constants
    pub temp_dir: PathBuf,

    // Audit
    pub audit_log_path: PathBuf,
    pub audit_log_json: bool,
}

/// Settings for the OpenAI-compatible gateway.
#[derive(Clone, Debug)]
pub struct AiConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required env vars
        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        let teacher_ids = parse_csv_i64(env_str("TEACHER_IDS"));
        let api_key = env_str("OPENAI_API_KEY").and_then(non_empty).unwrap_or_default();

        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }
        if teacher_ids.is_empty() {
            return Err(Error::Config(
                "TEACHER_IDS environment variable is required".to_string(),
            ));
        }
        if api_key.is_empty() {
            return Err(Error::Config(
                "OPENAI_API_KEY environment variable is required".to_string(),
            ));
        }

        // Provider selection; base URL may be overridden (self-hosted proxies).
        let kind = match env_str("AI_PROVIDER").and_then(non_empty) {
            Some(s) => ProviderKind::parse(&s)
                .ok_or_else(|| Error::Config(format!("unknown AI_PROVIDER: {s}")))?,
            None => ProviderKind::OpenAi,
        };
        let base_url = env_str("AI_BASE_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| kind.default_base_url().to_string());

        let text_model = env_str("AI_TEXT_MODEL")
            .and_then(non_empty)
            .unwrap_or_else(|| "gpt-4".to_string());
        let vision_model = env_str("AI_VISION_MODEL")
            .and_then(non_empty)
            .unwrap_or_else(|| "gpt-4o".to_string());
        let timeout = Duration::from_secs(env_u64("AI_TIMEOUT_SECS").unwrap_or(30));

        let check_ttl = Duration::from_secs(env_u64("CHECK_TTL_SECS").unwrap_or(300));

        let temp_dir =
            PathBuf::from(env_str("TEMP_DIR").unwrap_or("/tmp/homework-bot".to_string()));
        fs::create_dir_all(&temp_dir)?;

        let audit_log_path = PathBuf::from(
            env_str("AUDIT_LOG_PATH").unwrap_or("/tmp/homework-bot-audit.log".to_string()),
        );
        let audit_log_json = env_bool("AUDIT_LOG_JSON").unwrap_or(false);

        Ok(Self {
            telegram_bot_token,
            teacher_ids,
            ai: AiConfig {
                kind,
                api_key,
                base_url,
                text_model,
                vision_model,
                timeout,
            },
            check_ttl,
            temp_dir,
            audit_log_path,
            audit_log_json,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
