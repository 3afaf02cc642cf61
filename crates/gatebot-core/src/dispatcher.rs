use std::{future::Future, sync::Arc};

use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    errors::PlatformError,
    handlers,
    messaging::{
        port::ChatClient,
        types::{InboundEvent, OutboundAction},
    },
    store::Datastore,
};

/// Everything the bot needs at runtime, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub chat: Arc<dyn ChatClient>,
    pub datastore: Arc<dyn Datastore>,
}

/// What happened to a single inbound event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The handler's action reached the platform.
    Delivered,
    /// No handler wanted the event.
    Ignored,
    /// The event was malformed and dropped.
    Dropped,
    /// The platform rejected the action with a non-fatal error.
    Failed,
}

/// Why the receive loop returned without an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    StreamClosed,
}

pub struct Dispatcher {
    ctx: AppContext,
}

impl Dispatcher {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Pull events one at a time until `shutdown` resolves, the stream ends,
    /// or the platform rejects our credentials.
    ///
    /// Shutdown is only observed between events: an event that has been
    /// pulled is always handled to completion.
    pub async fn run<F>(&self, shutdown: F) -> Result<StopReason, PlatformError>
    where
        F: Future<Output = ()>,
    {
        let mut events = self.ctx.chat.receive_events()?;
        tokio::pin!(shutdown);

        info!("listening for events");

        loop {
            let next = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("shutdown requested, no longer receiving events");
                    return Ok(StopReason::Shutdown);
                }
                item = events.next() => item,
            };

            match next {
                None => {
                    warn!("event stream closed");
                    return Ok(StopReason::StreamClosed);
                }
                Some(Err(e)) if e.is_fatal() => {
                    error!(error = %e, "update stream failed");
                    return Err(e);
                }
                Some(Err(e)) => warn!(error = %e, "failed to receive events"),
                Some(Ok(event)) => {
                    self.dispatch(event).await?;
                }
            }
        }
    }

    /// Classify one event, run its handler and perform the resulting action.
    ///
    /// Only a fatal platform error is returned as `Err`.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<Outcome, PlatformError> {
        let kind = event.kind();
        let chat_id = event.chat_id().0;
        debug!(%kind, chat_id, "dispatching event");

        let action = match handlers::route(&event, self.ctx.chat.as_ref()) {
            Ok(Some(action)) => action,
            Ok(None) => {
                debug!(%kind, chat_id, "no handler for event");
                return Ok(Outcome::Ignored);
            }
            Err(e) => {
                warn!(%kind, chat_id, error = %e, "dropping event");
                return Ok(Outcome::Dropped);
            }
        };

        match self.perform(&action).await {
            Ok(()) => {
                if let OutboundAction::ApproveJoinRequest { user_id, .. } = &action {
                    info!(chat_id, user_id = user_id.0, "approved join request");
                }
                debug!(%kind, chat_id, action = action.name(), "event handled");
                Ok(Outcome::Delivered)
            }
            Err(e) if e.is_fatal() => {
                error!(%kind, chat_id, action = action.name(), error = %e, "stopping");
                Err(e)
            }
            Err(e) => {
                warn!(%kind, chat_id, action = action.name(), error = %e, "action failed");
                Ok(Outcome::Failed)
            }
        }
    }

    async fn perform(&self, action: &OutboundAction) -> Result<(), PlatformError> {
        match action {
            OutboundAction::SendText {
                chat_id,
                text,
                format,
            } => self.ctx.chat.send_text(*chat_id, text, *format).await,
            OutboundAction::ApproveJoinRequest { chat_id, user_id } => {
                self.ctx.chat.approve_join_request(*chat_id, *user_id).await
            }
        }
    }
}
