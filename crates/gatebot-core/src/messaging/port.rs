use std::pin::Pin;

use async_trait::async_trait;
use tokio_stream::Stream;

use crate::{
    domain::{ChatId, Sender, UserId},
    errors::PlatformError,
    formatting,
    messaging::types::{InboundEvent, TextFormat},
};

/// Lazy, infinite sequence of inbound events in platform delivery order.
pub type EventStream =
    Pin<Box<dyn Stream<Item = Result<InboundEvent, PlatformError>> + Send + 'static>>;

/// Chat platform port.
///
/// Telegram is the implementation; the dispatcher and handlers only ever talk
/// to this trait. Implementations do not retry: backoff belongs to the
/// underlying client library.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), PlatformError>;

    async fn approve_join_request(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<(), PlatformError>;

    /// Start receiving events. Can be called once; later calls return
    /// [`PlatformError::StreamTaken`].
    fn receive_events(&self) -> Result<EventStream, PlatformError>;

    fn mention_html(&self, user: &Sender) -> String {
        formatting::mention_html(user)
    }
}
