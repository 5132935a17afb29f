use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Agent => f.write_str("agent"),
        }
    }
}

/// One message in a chat. Immutable once stored: the store assigns `id`
/// and `timestamp` at append time and never rewrites a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Sender::Agent).unwrap(), r#""agent""#);
    }

    #[test]
    fn message_roundtrip() {
        let msg = ChatMessage {
            id: "abc".into(),
            sender: Sender::Agent,
            text: "hi".into(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "abc");
        assert_eq!(back.sender, Sender::Agent);
    }
}
