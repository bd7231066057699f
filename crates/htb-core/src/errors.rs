use crate::gateway::GatewayError;

/// Core error type.
///
/// Adapter crates map their specific errors into this type so handlers can
/// tell fatal startup problems apart from per-message failures that become a
/// reply to the sender.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("check failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("delivery error: {0}")]
    Delivery(String),

    #[error("user {0} is not authorized for this command")]
    Unauthorized(i64),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
