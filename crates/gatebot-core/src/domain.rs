/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// The user behind an inbound event, as much of it as the platform tells us.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl Sender {
    pub fn new(id: UserId, first_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: None,
        }
    }

    /// `first last`, or just `first` when there is no last name.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_last_name() {
        let mut s = Sender::new(UserId(1), "Ada");
        assert_eq!(s.full_name(), "Ada");

        s.last_name = Some("Lovelace".to_string());
        assert_eq!(s.full_name(), "Ada Lovelace");

        s.last_name = Some(String::new());
        assert_eq!(s.full_name(), "Ada");
    }
}
