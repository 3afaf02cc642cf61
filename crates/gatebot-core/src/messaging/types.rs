use crate::domain::{ChatId, Sender, UserId};

/// Inbound update from the chat platform, already classified by the adapter.
///
/// Telegram-specific fields stay in the Telegram adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    JoinRequest(JoinRequest),
    Command(Command),
    Text(TextMessage),
}

/// A user asking to join a chat that requires approval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinRequest {
    pub chat_id: ChatId,
    pub user: Sender,
}

/// `/name args`, with the marker and any `@botname` suffix stripped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub chat_id: ChatId,
    pub sender: Option<Sender>,
    pub name: String,
    pub args: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub sender: Option<Sender>,
    pub text: String,
}

/// Event kinds in dispatch priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    JoinRequest,
    Command,
    Text,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::JoinRequest => "join_request",
            EventKind::Command => "command",
            EventKind::Text => "text",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InboundEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::JoinRequest(_) => EventKind::JoinRequest,
            InboundEvent::Command(_) => EventKind::Command,
            InboundEvent::Text(_) => EventKind::Text,
        }
    }

    pub fn chat_id(&self) -> ChatId {
        match self {
            InboundEvent::JoinRequest(r) => r.chat_id,
            InboundEvent::Command(c) => c.chat_id,
            InboundEvent::Text(t) => t.chat_id,
        }
    }
}

/// How the platform should render outgoing text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// A single call back into the chat platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundAction {
    SendText {
        chat_id: ChatId,
        text: String,
        format: TextFormat,
    },
    ApproveJoinRequest {
        chat_id: ChatId,
        user_id: UserId,
    },
}

impl OutboundAction {
    pub fn plain(chat_id: ChatId, text: impl Into<String>) -> Self {
        OutboundAction::SendText {
            chat_id,
            text: text.into(),
            format: TextFormat::Plain,
        }
    }

    pub fn html(chat_id: ChatId, html: impl Into<String>) -> Self {
        OutboundAction::SendText {
            chat_id,
            text: html.into(),
            format: TextFormat::Html,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutboundAction::SendText { .. } => "send_text",
            OutboundAction::ApproveJoinRequest { .. } => "approve_join_request",
        }
    }
}
