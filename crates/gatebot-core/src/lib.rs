//! Core of the gatebot Telegram bot: event model, ports, handlers and the
//! dispatch loop.
//!
//! This crate is intentionally framework-agnostic. Telegram and MongoDB live
//! behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod handlers;
pub mod logging;
pub mod messaging;
pub mod store;

#[cfg(test)]
mod testing;

pub use errors::{Error, Result};
