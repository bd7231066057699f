use async_trait::async_trait;

use super::types::{AiRequest, GatewayError, ProviderKind};

/// LLM provider port.
///
/// One implementation per backend; the router depends only on this trait.
/// A call is a single attempt: no retries, and any failure comes back as a
/// `GatewayError` rather than escaping the boundary.
#[async_trait]
pub trait AiProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn complete(&self, req: &AiRequest) -> Result<String, GatewayError>;
}
