use crate::domain::Sender;

/// Marker that turns a Telegram message into a bot command.
pub const COMMAND_MARKER: char = '/';

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Inline mention of a user that works even when they have no username.
pub fn mention_html(sender: &Sender) -> String {
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        sender.id.0,
        escape_html(&sender.full_name())
    )
}

/// A command split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercased name without the leading marker.
    pub name: String,
    /// Bot username from `/cmd@botname`, if present.
    pub addressee: Option<String>,
    pub args: String,
}

impl ParsedCommand {
    /// Whether the command is meant for the bot called `bot_username`.
    ///
    /// Commands without an explicit addressee are for everyone.
    pub fn is_for(&self, bot_username: Option<&str>) -> bool {
        match (&self.addressee, bot_username) {
            (None, _) | (_, None) => true,
            (Some(to), Some(me)) => to.eq_ignore_ascii_case(me),
        }
    }
}

/// Parse `/cmd@botname arg1 ...`. Returns `None` for text that is not a command.
pub fn parse_command(text: &str) -> Option<ParsedCommand> {
    let text = text.trim_start();
    let rest = text.strip_prefix(COMMAND_MARKER)?;

    let mut parts = rest.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim().to_string();

    let (name, addressee) = match head.split_once('@') {
        Some((name, to)) if !to.is_empty() => (name, Some(to.to_string())),
        Some((name, _)) => (name, None),
        None => (head, None),
    };

    Some(ParsedCommand {
        name: name.to_lowercase(),
        addressee,
        args,
    })
}
