/// The LLM backend a gateway instance talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    OpenRouter,
}

impl ProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "openrouter" => Some(Self::OpenRouter),
            _ => None,
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }
}

/// Binary image payload with its declared media type (e.g. `image/jpeg`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageAttachment {
    pub data: Vec<u8>,
    pub mime: String,
}

/// A single completion request.
///
/// Fields are private so the "at least one of prompt/attachment" invariant
/// holds for every constructed value.
#[derive(Clone, Debug)]
pub struct AiRequest {
    prompt: String,
    attachment: Option<ImageAttachment>,
}

impl AiRequest {
    pub fn text(prompt: impl Into<String>) -> Result<Self, GatewayError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(GatewayError::EmptyRequest);
        }
        Ok(Self {
            prompt,
            attachment: None,
        })
    }

    pub fn with_image(
        prompt: impl Into<String>,
        attachment: ImageAttachment,
    ) -> Result<Self, GatewayError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() && attachment.data.is_empty() {
            return Err(GatewayError::EmptyRequest);
        }
        Ok(Self {
            prompt,
            attachment: Some(attachment),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn attachment(&self) -> Option<&ImageAttachment> {
        self.attachment.as_ref()
    }
}

/// Typed gateway failure.
///
/// Display stays a one-line diagnostic: this text is what a sender sees, so
/// provider payloads never pass through it.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("empty request (no prompt, no attachment)")]
    EmptyRequest,

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_request_is_rejected() {
        assert!(matches!(
            AiRequest::text("   "),
            Err(GatewayError::EmptyRequest)
        ));
        assert!(AiRequest::text("2x+3=7").is_ok());
    }

    #[test]
    fn image_request_allows_empty_prompt_with_data() {
        let att = ImageAttachment {
            data: vec![1, 2, 3],
            mime: "image/jpeg".to_string(),
        };
        assert!(AiRequest::with_image("", att).is_ok());

        let empty = ImageAttachment {
            data: Vec::new(),
            mime: "image/jpeg".to_string(),
        };
        assert!(matches!(
            AiRequest::with_image(" ", empty),
            Err(GatewayError::EmptyRequest)
        ));
    }

    #[test]
    fn provider_kind_parses_known_names() {
        assert_eq!(ProviderKind::parse("OpenAI"), Some(ProviderKind::OpenAi));
        assert_eq!(
            ProviderKind::parse(" openrouter "),
            Some(ProviderKind::OpenRouter)
        );
        assert_eq!(ProviderKind::parse("anthropic"), None);
    }
}
