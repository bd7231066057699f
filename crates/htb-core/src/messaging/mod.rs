//! Cross-messenger abstractions (Telegram today).

pub mod port;
pub mod types;

pub use port::MessagingPort;
pub use types::{Outgoing, PhotoRef};
