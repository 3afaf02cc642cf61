use std::{env, fmt, path::Path, time::Duration};

use crate::errors::ConfigError;

pub const DEFAULT_DATASTORE_DB: &str = "telegram_bot_db";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 10;
/// Long-poll timeouts must stay under teloxide's 17 s HTTP client timeout,
/// otherwise every idle poll fails as a network error.
pub const MAX_POLL_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Typed startup configuration.
///
/// Loaded once before anything touches the network and read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    // Required
    pub bot_token: String,
    pub datastore_uri: String,

    // Datastore
    pub datastore_db: String,

    // Update stream
    pub poll_timeout: Duration,
    pub drop_pending_updates: bool,
    pub event_buffer: usize,
}

impl Config {
    /// Load from the process environment, seeded from `./.env` when present.
    pub fn load() -> Result<Self, ConfigError> {
        seed_env_from(Path::new(".env"))?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = required(&lookup, "BOT_TOKEN", "TELEGRAM_BOT_TOKEN")?;
        let datastore_uri = required(&lookup, "DATASTORE_URI", "MONGODB_CONNECTION_STRING")?;

        let datastore_db = lookup("DATASTORE_DB")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_DATASTORE_DB.to_string());

        let poll_timeout = Duration::from_secs(
            parsed(&lookup, "POLL_TIMEOUT_SECS", |s| {
                s.parse::<u64>()
                    .ok()
                    .filter(|secs| *secs <= MAX_POLL_TIMEOUT_SECS)
            })?
            .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
        );
        let drop_pending_updates =
            parsed(&lookup, "DROP_PENDING_UPDATES", parse_bool)?.unwrap_or(false);
        let event_buffer = parsed(&lookup, "EVENT_BUFFER", |s| s.parse::<usize>().ok())?
            .unwrap_or(DEFAULT_EVENT_BUFFER)
            .max(1);

        Ok(Self {
            bot_token,
            datastore_uri,
            datastore_db,
            poll_timeout,
            drop_pending_updates,
            event_buffer,
        })
    }
}

// Keep secrets out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("datastore_uri", &"<redacted>")
            .field("datastore_db", &self.datastore_db)
            .field("poll_timeout", &self.poll_timeout)
            .field("drop_pending_updates", &self.drop_pending_updates)
            .field("event_buffer", &self.event_buffer)
            .finish()
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    alias: &'static str,
) -> Result<String, ConfigError> {
    lookup(key)
        .and_then(non_empty)
        .or_else(|| lookup(alias).and_then(non_empty))
        .map(|v| v.trim().to_string())
        .ok_or(ConfigError::Missing(key))
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(key).and_then(non_empty) else {
        return Ok(None);
    };
    parse(raw.trim())
        .map(Some)
        .ok_or(ConfigError::Invalid { key, value: raw })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Seed the process environment from a dotenv file. Existing variables win.
/// A missing file is fine; an unreadable or malformed one is not.
fn seed_env_from(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Invalid {
            key: ".env",
            value: e.to_string(),
        }),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
