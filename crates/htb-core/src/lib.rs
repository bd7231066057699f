//! Core domain + application logic for the homework Telegram bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the LLM
//! backend live behind ports (traits) implemented in adapter crates.

pub mod broadcast;
pub mod config;
pub mod domain;
pub mod errors;
pub mod gateway;
pub mod logging;
pub mod messaging;
pub mod roster;
pub mod router;
pub mod session;
pub mod utils;

pub use errors::{Error, Result};
