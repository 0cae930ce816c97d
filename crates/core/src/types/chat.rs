//! Concierge chat messages and transcripts.

use serde::{Deserialize, Serialize};

/// Who authored a chat message.
///
/// Serialized names match the roles the generative model expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    /// A message typed by the shopper.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    /// A message attributed to the concierge.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Append-only conversation history.
///
/// There is deliberately no way to edit or delete an entry once pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Append a message to the end of the transcript.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Messages in the order they were appended.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The most recent message, if any.
    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&ChatMessage::user("こんにちは")).expect("serialize");
        assert!(json.contains("\"role\":\"user\""));

        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"model","text":"いらっしゃいませ"}"#).expect("parse");
        assert_eq!(msg.role, ChatRole::Model);
    }

    #[test]
    fn test_transcript_appends_in_order() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("hello"));
        transcript.push(ChatMessage::model("welcome"));

        assert_eq!(transcript.len(), 2);
        assert_eq!(
            transcript.messages().first().map(|m| m.role),
            Some(ChatRole::User)
        );
        assert_eq!(transcript.last().map(|m| m.text.as_str()), Some("welcome"));
    }

    #[test]
    fn test_transcript_serializes_as_array() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("hi"));
        let json = serde_json::to_string(&transcript).expect("serialize");
        assert_eq!(json, r#"[{"role":"user","text":"hi"}]"#);
    }
}
