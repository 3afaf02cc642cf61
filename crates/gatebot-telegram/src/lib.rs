//! Telegram adapter (teloxide).
//!
//! This crate implements the `gatebot-core` ChatClient port over the Telegram
//! Bot API and wires the dispatcher to teloxide's long-polling listener.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode, ApiError, RequestError};

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

pub mod router;
pub mod updates;

use gatebot_core::{
    config::Config,
    domain::{ChatId, UserId},
    errors::PlatformError,
    messaging::{
        port::{ChatClient, EventStream},
        types::TextFormat,
    },
};

/// Long-polling knobs handed to teloxide.
#[derive(Clone, Debug)]
pub struct PollingSettings {
    pub timeout: Duration,
    pub drop_pending_updates: bool,
    pub buffer: usize,
}

impl From<&Config> for PollingSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            timeout: cfg.poll_timeout,
            drop_pending_updates: cfg.drop_pending_updates,
            buffer: cfg.event_buffer.max(1),
        }
    }
}

pub struct TelegramClient {
    bot: Bot,
    polling: PollingSettings,
    bot_username: Option<String>,
    streaming: AtomicBool,
}

impl TelegramClient {
    pub fn new(bot: Bot, polling: PollingSettings) -> Self {
        Self {
            bot,
            polling,
            bot_username: None,
            streaming: AtomicBool::new(false),
        }
    }

    /// Commands addressed to another bot (`/start@other_bot`) are ignored once
    /// our own username is known.
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.bot_username = username;
        self
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_user(user_id: UserId) -> teloxide::types::UserId {
        teloxide::types::UserId(user_id.0 as u64)
    }
}

/// Map teloxide failures onto the platform error taxonomy. No retries here:
/// `RetryAfter` is reported as-is.
///
/// teloxide-core reports a rejected token ("Unauthorized") as `ApiError::NotFound`.
pub fn map_request_error(e: RequestError) -> PlatformError {
    match e {
        RequestError::RetryAfter(_) => PlatformError::RateLimited,
        RequestError::Api(ApiError::NotFound) => PlatformError::Unauthorized,
        RequestError::Network(_) | RequestError::Io(_) => PlatformError::NetworkUnavailable,
        other => PlatformError::Unknown(other.to_string()),
    }
}

#[async_trait]
impl ChatClient for TelegramClient {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), PlatformError> {
        let mut req = self
            .bot
            .send_message(Self::tg_chat(chat_id), text.to_string());
        if format == TextFormat::Html {
            req = req.parse_mode(ParseMode::Html);
        }
        req.await.map_err(map_request_error)?;
        Ok(())
    }

    async fn approve_join_request(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<(), PlatformError> {
        self.bot
            .approve_chat_join_request(Self::tg_chat(chat_id), Self::tg_user(user_id))
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    fn receive_events(&self) -> Result<EventStream, PlatformError> {
        if self.streaming.swap(true, Ordering::SeqCst) {
            return Err(PlatformError::StreamTaken);
        }

        let (tx, rx) = mpsc::channel(self.polling.buffer);
        tokio::spawn(updates::forward_updates(
            self.bot.clone(),
            self.polling.clone(),
            self.bot_username.clone(),
            tx,
        ));

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_token_is_unauthorized() {
        let mapped = map_request_error(RequestError::Api(ApiError::NotFound));
        assert_eq!(mapped, PlatformError::Unauthorized);
        assert!(mapped.is_fatal());
    }

    #[test]
    fn other_api_errors_are_unknown() {
        let mapped = map_request_error(RequestError::Api(ApiError::ChatNotFound));
        assert!(matches!(mapped, PlatformError::Unknown(_)));
        assert!(!mapped.is_fatal());
    }

    #[test]
    fn polling_settings_follow_config() {
        let cfg = Config::from_lookup(|k| match k {
            "BOT_TOKEN" => Some("1:x".to_string()),
            "DATASTORE_URI" => Some("mongodb://localhost".to_string()),
            "POLL_TIMEOUT_SECS" => Some("12".to_string()),
            "DROP_PENDING_UPDATES" => Some("true".to_string()),
            _ => None,
        })
        .unwrap();
        let s = PollingSettings::from(&cfg);
        assert_eq!(s.timeout, Duration::from_secs(12));
        assert!(s.drop_pending_updates);
        assert_eq!(s.buffer, cfg.event_buffer);
    }

    #[tokio::test]
    async fn update_stream_is_not_restartable() {
        let client = TelegramClient::new(
            Bot::new("1:invalid"),
            PollingSettings {
                timeout: Duration::from_secs(1),
                drop_pending_updates: false,
                buffer: 1,
            },
        );
        let first = client.receive_events();
        assert!(first.is_ok());
        assert!(matches!(
            client.receive_events(),
            Err(PlatformError::StreamTaken)
        ));
    }
}
