//! Turning teloxide updates into core inbound events.

use teloxide::{
    prelude::*,
    types::{AllowedUpdate, UpdateKind, User},
    update_listeners::{AsUpdateStream, Polling},
};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{debug, info};

use gatebot_core::{
    domain::{ChatId, Sender, UserId},
    errors::PlatformError,
    formatting::parse_command,
    messaging::types::{Command, InboundEvent, JoinRequest, TextMessage},
};

use crate::{map_request_error, PollingSettings};

/// Update types the bot asks Telegram for.
pub fn allowed_updates() -> Vec<AllowedUpdate> {
    vec![AllowedUpdate::Message, AllowedUpdate::ChatJoinRequest]
}

/// Run teloxide's long-polling listener and push converted events into `tx`
/// in the order Telegram delivered them. Returns once the receiver is gone.
pub async fn forward_updates(
    bot: Bot,
    settings: PollingSettings,
    bot_username: Option<String>,
    tx: mpsc::Sender<Result<InboundEvent, PlatformError>>,
) {
    let mut builder = Polling::builder(bot)
        .timeout(settings.timeout)
        .allowed_updates(allowed_updates());
    if settings.drop_pending_updates {
        builder = builder.drop_pending_updates();
    }
    let mut polling = builder.delete_webhook().await.build();

    info!(timeout_secs = settings.timeout.as_secs(), "long polling started");

    let stream = polling.as_stream();
    tokio::pin!(stream);

    while let Some(item) = stream.next().await {
        let event = match item {
            Ok(update) => match classify_update(update, bot_username.as_deref()) {
                Some(event) => Ok(event),
                None => continue,
            },
            Err(e) => Err(map_request_error(e)),
        };

        if tx.send(event).await.is_err() {
            debug!("event receiver dropped, stopping long polling");
            break;
        }
    }
}

/// Classify an update. Join requests first, then commands, then text.
/// Anything else (edits, photos, stickers, service messages) yields `None`.
pub fn classify_update(update: Update, bot_username: Option<&str>) -> Option<InboundEvent> {
    match update.kind {
        UpdateKind::ChatJoinRequest(req) => Some(InboundEvent::JoinRequest(JoinRequest {
            chat_id: ChatId(req.chat.id.0),
            user: sender_from_user(&req.from),
        })),
        UpdateKind::Message(msg) => classify_message(
            ChatId(msg.chat.id.0),
            msg.from().map(sender_from_user),
            msg.text()?,
            bot_username,
        ),
        _ => None,
    }
}

/// Classify the text of a message as a command or plain text.
pub fn classify_message(
    chat_id: ChatId,
    sender: Option<Sender>,
    text: &str,
    bot_username: Option<&str>,
) -> Option<InboundEvent> {
    let Some(cmd) = parse_command(text) else {
        return Some(InboundEvent::Text(TextMessage {
            chat_id,
            sender,
            text: text.to_string(),
        }));
    };

    if !cmd.is_for(bot_username) {
        debug!(chat_id = chat_id.0, command = %cmd.name, "command addressed to another bot");
        return None;
    }

    Some(InboundEvent::Command(Command {
        chat_id,
        sender,
        name: cmd.name,
        args: cmd.args,
    }))
}

pub fn sender_from_user(user: &User) -> Sender {
    Sender {
        id: UserId(user.id.0 as i64),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}
