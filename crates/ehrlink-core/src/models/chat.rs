use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    pub created_by: Option<i64>,
    pub created_at: Option<String>,
    pub last_message: Option<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRoomInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Who authored a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Patient,
    Clinician,
    Bot,
    #[serde(other)]
    Other,
}

impl MessageRole {
    pub fn is_bot(&self) -> bool {
        matches!(self, MessageRole::Bot)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub room_id: i64,
    pub sender_id: Option<i64>,
    pub content: String,
    pub role: MessageRole,
    #[serde(default)]
    pub is_ai: bool,
    pub message_type: Option<String>,
    pub status: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostMessageInput {
    pub content: String,
    pub role: MessageRole,
}

/// Plain message for `POST /chat/rooms/{id}/messages`, no bot involved
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageInput {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
}

impl SendMessageInput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            message_type: None,
        }
    }
}

/// Response of `POST /chat/rooms/{id}/post_message`: the bot reply plus the
/// whole conversation as the server now sees it
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    #[serde(default)]
    pub bot_reply: Option<String>,
    #[serde(default)]
    pub conversation: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_message_response() {
        let json = r#"{"bot_reply": "Hello!", "conversation": [
            {"id": 1, "room_id": 5, "sender_id": 2, "content": "Hi", "role": "patient", "is_ai": false, "message_type": "text", "status": "sent", "timestamp": "2024-06-01T10:00:00"},
            {"id": 2, "room_id": 5, "sender_id": 0, "content": "Hello!", "role": "bot", "is_ai": true, "message_type": "text", "status": "sent", "timestamp": "2024-06-01T10:00:02"}
        ]}"#;
        let resp: PostMessageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.bot_reply.as_deref(), Some("Hello!"));
        assert_eq!(resp.conversation.len(), 2);
        assert!(resp.conversation[1].role.is_bot());
    }

    #[test]
    fn test_unknown_role_tolerated() {
        let json = r#"{"id": 1, "room_id": 5, "content": "x", "role": "system"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.role, MessageRole::Other);
    }
}
