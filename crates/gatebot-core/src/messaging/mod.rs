//! Chat platform abstractions: event/action model and the client port.

pub mod port;
pub mod types;
