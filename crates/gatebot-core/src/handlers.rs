//! Handlers map one inbound event to at most one outbound action.
//!
//! They are pure apart from logging: no shared state, no datastore access. The
//! chat client is only consulted for formatting.

use tracing::info;

use crate::{
    errors::HandlerError,
    messaging::{
        port::ChatClient,
        types::{Command, InboundEvent, JoinRequest, OutboundAction, TextMessage},
    },
};

pub const HELP_TEXT: &str = "Help!";

pub type HandlerResult = Result<Option<OutboundAction>, HandlerError>;

/// Route an event to its handler. Arms follow dispatch priority:
/// join requests, then commands, then plain text.
pub fn route(event: &InboundEvent, chat: &dyn ChatClient) -> HandlerResult {
    match event {
        InboundEvent::JoinRequest(req) => Ok(Some(approve_join(req))),
        InboundEvent::Command(cmd) => match cmd.name.as_str() {
            "" => Err(HandlerError::EmptyCommand),
            "start" => greet(cmd, chat).map(Some),
            "help" => Ok(Some(help(cmd))),
            _ => Ok(None),
        },
        InboundEvent::Text(msg) => echo(msg).map(Some),
    }
}

/// `/start`: greet the sender with an inline mention.
pub fn greet(cmd: &Command, chat: &dyn ChatClient) -> Result<OutboundAction, HandlerError> {
    let sender = cmd.sender.as_ref().ok_or(HandlerError::MissingSender)?;
    Ok(OutboundAction::html(
        cmd.chat_id,
        format!("Hi {}!", chat.mention_html(sender)),
    ))
}

/// `/help`
pub fn help(cmd: &Command) -> OutboundAction {
    OutboundAction::plain(cmd.chat_id, HELP_TEXT)
}

/// Echo a plain text message back to its chat.
pub fn echo(msg: &TextMessage) -> Result<OutboundAction, HandlerError> {
    if msg.text.is_empty() {
        return Err(HandlerError::EmptyText);
    }
    info!(chat_id = msg.chat_id.0, text = %msg.text, "received message");
    Ok(OutboundAction::plain(
        msg.chat_id,
        format!("You said: {}", msg.text),
    ))
}

pub fn approve_join(req: &JoinRequest) -> OutboundAction {
    OutboundAction::ApproveJoinRequest {
        chat_id: req.chat_id,
        user_id: req.user.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatId, Sender, UserId},
        messaging::types::TextFormat,
        testing::RecordingChat,
    };

    fn command(name: &str, sender: Option<Sender>) -> InboundEvent {
        InboundEvent::Command(Command {
            chat_id: ChatId(10),
            sender,
            name: name.to_string(),
            args: String::new(),
        })
    }

    fn text(t: &str) -> InboundEvent {
        InboundEvent::Text(TextMessage {
            chat_id: ChatId(42),
            sender: Some(Sender::new(UserId(1), "Ada")),
            text: t.to_string(),
        })
    }

    #[test]
    fn start_greets_with_a_single_mention() {
        let chat = RecordingChat::default();
        let sender = Sender::new(UserId(7), "Ada");
        let action = route(&command("start", Some(sender.clone())), &chat)
            .unwrap()
            .unwrap();

        let OutboundAction::SendText {
            chat_id,
            text,
            format,
        } = action
        else {
            panic!("expected send_text");
        };
        assert_eq!(chat_id, ChatId(10));
        assert_eq!(format, TextFormat::Html);
        assert!(text.starts_with("Hi "));
        assert_eq!(text.matches("Hi ").count(), 1);
        assert!(text.contains(&chat.mention_html(&sender)));
        assert!(text.ends_with('!'));
    }

    #[test]
    fn start_without_sender_is_rejected() {
        let chat = RecordingChat::default();
        let err = route(&command("start", None), &chat).unwrap_err();
        assert_eq!(err, HandlerError::MissingSender);
    }

    #[test]
    fn help_replies_verbatim() {
        let chat = RecordingChat::default();
        let action = route(&command("help", None), &chat).unwrap();
        assert_eq!(action, Some(OutboundAction::plain(ChatId(10), "Help!")));
    }

    #[test]
    fn unknown_command_produces_nothing() {
        let chat = RecordingChat::default();
        assert_eq!(route(&command("settings", None), &chat).unwrap(), None);
    }

    #[test]
    fn empty_command_is_rejected() {
        let chat = RecordingChat::default();
        let err = route(&command("", None), &chat).unwrap_err();
        assert_eq!(err, HandlerError::EmptyCommand);
    }

    #[test]
    fn echo_is_stable_for_repeated_input() {
        let chat = RecordingChat::default();
        let first = route(&text("hello"), &chat).unwrap();
        let second = route(&text("hello"), &chat).unwrap();
        assert_eq!(
            first,
            Some(OutboundAction::plain(ChatId(42), "You said: hello"))
        );
        assert_eq!(first, second);
    }

    #[test]
    fn echo_rejects_empty_text() {
        let chat = RecordingChat::default();
        assert_eq!(route(&text(""), &chat).unwrap_err(), HandlerError::EmptyText);
    }

    #[test]
    fn join_request_is_approved_for_the_requesting_user() {
        let chat = RecordingChat::default();
        let ev = InboundEvent::JoinRequest(JoinRequest {
            chat_id: ChatId(7),
            user: Sender::new(UserId(99), "Bob"),
        });
        assert_eq!(
            route(&ev, &chat).unwrap(),
            Some(OutboundAction::ApproveJoinRequest {
                chat_id: ChatId(7),
                user_id: UserId(99),
            })
        );
    }
}
