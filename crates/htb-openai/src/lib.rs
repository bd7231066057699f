//! OpenAI-compatible gateway adapter.
//!
//! One client covers OpenAI and OpenRouter; the configured base URL picks the
//! backend. Text requests send a single user turn; image requests send a
//! multi-part turn with the image inlined as a base64 data URL.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;

use htb_core::{
    config::AiConfig,
    gateway::{AiProvider, AiRequest, GatewayError, ProviderKind},
    utils::truncate_text,
};

#[derive(Clone, Debug)]
pub struct OpenAiProvider {
    kind: ProviderKind,
    api_key: String,
    base_url: String,
    text_model: String,
    vision_model: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(cfg: &AiConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .expect("reqwest client build");

        Self {
            kind: cfg.kind,
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            text_model: cfg.text_model.clone(),
            vision_model: cfg.vision_model.clone(),
            timeout: cfg.timeout,
            http,
        }
    }

    fn build_body(&self, req: &AiRequest) -> serde_json::Value {
        let Some(att) = req.attachment() else {
            return serde_json::json!({
                "model": self.text_model,
                "messages": [{ "role": "user", "content": req.prompt() }],
                "temperature": 0.2,
            });
        };

        let data_url = format!(
            "data:{};base64,{}",
            att.mime,
            base64::engine::general_purpose::STANDARD.encode(&att.data)
        );
        serde_json::json!({
            "model": self.vision_model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": req.prompt() },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]
            }],
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn complete(&self, req: &AiRequest) -> Result<String, GatewayError> {
        let body = self.build_body(req);

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            // The error body stays in the log; only the status code travels up.
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                "provider error: {}",
                truncate_text(&body, 200)
            );
            return Err(GatewayError::Status(status.as_u16()));
        }

        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(format!("invalid json: {e}")))?;
        extract_text(&v)
    }
}

fn map_send_error(e: reqwest::Error, timeout: Duration) -> GatewayError {
    if e.is_timeout() {
        return GatewayError::Timeout(timeout.as_secs());
    }
    GatewayError::Transport(e.to_string())
}

fn extract_text(v: &serde_json::Value) -> Result<String, GatewayError> {
    let content = v
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| {
            GatewayError::Malformed("missing choices[0].message.content".to_string())
        })?;

    let text = content.trim().to_string();
    if text.is_empty() {
        return Err(GatewayError::Malformed("empty completion text".to_string()));
    }
    Ok(text)
}
