//! In-memory doubles shared by the unit tests in this crate.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use tokio_stream::StreamExt;

use crate::{
    config::Config,
    domain::{ChatId, UserId},
    errors::PlatformError,
    messaging::{
        port::{ChatClient, EventStream},
        types::{InboundEvent, TextFormat},
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    SendText {
        chat_id: ChatId,
        text: String,
        format: TextFormat,
    },
    Approve {
        chat_id: ChatId,
        user_id: UserId,
    },
}

/// Chat client that records every call and replays a fixed list of events.
#[derive(Default)]
pub struct RecordingChat {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<i64, PlatformError>>,
    events: Mutex<Option<Vec<Result<InboundEvent, PlatformError>>>>,
    hold_open: bool,
}

impl RecordingChat {
    /// Stream `events`, then end the stream.
    pub fn with_events(events: Vec<Result<InboundEvent, PlatformError>>) -> Self {
        Self {
            events: Mutex::new(Some(events)),
            ..Self::default()
        }
    }

    /// Stream `events`, then stay pending forever like a real long poll.
    pub fn with_events_held_open(events: Vec<Result<InboundEvent, PlatformError>>) -> Self {
        Self {
            hold_open: true,
            ..Self::with_events(events)
        }
    }

    /// Every outbound call for `chat_id` fails with `err`.
    pub fn fail_for(self, chat_id: i64, err: PlatformError) -> Self {
        self.failures.lock().unwrap().insert(chat_id, err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, chat_id: ChatId, call: Call) -> Result<(), PlatformError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(&chat_id.0) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChatClient for RecordingChat {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), PlatformError> {
        self.record(
            chat_id,
            Call::SendText {
                chat_id,
                text: text.to_string(),
                format,
            },
        )
    }

    async fn approve_join_request(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<(), PlatformError> {
        self.record(chat_id, Call::Approve { chat_id, user_id })
    }

    fn receive_events(&self) -> Result<EventStream, PlatformError> {
        let events = self
            .events
            .lock()
            .unwrap()
            .take()
            .ok_or(PlatformError::StreamTaken)?;
        let stream = tokio_stream::iter(events);
        if self.hold_open {
            Ok(Box::pin(stream.chain(tokio_stream::pending())))
        } else {
            Ok(Box::pin(stream))
        }
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "BOT_TOKEN" => Some("123:test".to_string()),
        "DATASTORE_URI" => Some("mongodb://localhost:27017".to_string()),
        _ => None,
    })
    .unwrap()
}
