/// Startup configuration problems. Always fatal, always raised before the bot
/// touches the network.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Failures surfaced by the chat platform adapter.
///
/// Only `Unauthorized` stops the bot; everything else is logged and the
/// receive loop moves on to the next event.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("rate limited by the platform")]
    RateLimited,

    #[error("bot token rejected by the platform")]
    Unauthorized,

    #[error("platform unreachable")]
    NetworkUnavailable,

    #[error("platform error: {0}")]
    Unknown(String),

    #[error("update stream already taken")]
    StreamTaken,
}

impl PlatformError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, PlatformError::Unauthorized)
    }
}

/// An inbound event whose shape a handler cannot work with. The event is
/// logged and dropped.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum HandlerError {
    #[error("event has no sender")]
    MissingSender,

    #[error("text message has no text")]
    EmptyText,

    #[error("command has no name")]
    EmptyCommand,
}

/// Core error type.
///
/// Adapter crates map their specific errors into this type so the binary can
/// decide on an exit status in one place.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Platform(#[from] PlatformError),

    #[error("datastore error: {0}")]
    Datastore(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
