//! Local chat thread state with optimistic sends.
//!
//! A message the user sends shows up immediately as pending. When the
//! server answers with the full conversation, the thread adopts it and the
//! pending entry disappears; when the send fails, the pending entry is
//! removed and its text handed back so it can be put back in the composer.

use chrono::Utc;

use crate::models::{ChatMessage, MessageRole, PostMessageInput};

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadEntry {
    /// Server id, `None` while the message is still pending
    pub server_id: Option<i64>,
    /// Local id of a pending message
    pub local_id: Option<u64>,
    pub content: String,
    pub role: MessageRole,
    pub is_ai: bool,
    pub timestamp: Option<String>,
}

impl ThreadEntry {
    pub fn is_pending(&self) -> bool {
        self.server_id.is_none()
    }
}

impl From<ChatMessage> for ThreadEntry {
    fn from(msg: ChatMessage) -> Self {
        Self {
            server_id: Some(msg.id),
            local_id: None,
            content: msg.content,
            role: msg.role,
            is_ai: msg.is_ai,
            timestamp: msg.timestamp,
        }
    }
}

/// A send that has been shown locally but not yet acknowledged
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub local_id: u64,
    pub input: PostMessageInput,
}

#[derive(Debug, Clone)]
pub struct ChatThread {
    room_id: i64,
    confirmed: Vec<ThreadEntry>,
    pending: Vec<ThreadEntry>,
    next_local_id: u64,
}

impl ChatThread {
    pub fn new(room_id: i64) -> Self {
        Self {
            room_id,
            confirmed: Vec::new(),
            pending: Vec::new(),
            next_local_id: 1,
        }
    }

    pub fn room_id(&self) -> i64 {
        self.room_id
    }

    /// Replace the server-side history. Pending sends stay at the end.
    pub fn load(&mut self, messages: Vec<ChatMessage>) {
        self.confirmed = messages
            .into_iter()
            .filter(|m| m.room_id == self.room_id)
            .map(ThreadEntry::from)
            .collect();
    }

    /// Show `content` as pending. Blank messages are not sent.
    pub fn begin_send(&mut self, content: &str, role: MessageRole) -> Option<PendingSend> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        let local_id = self.next_local_id;
        self.next_local_id += 1;
        self.pending.push(ThreadEntry {
            server_id: None,
            local_id: Some(local_id),
            content: content.to_string(),
            role: role.clone(),
            is_ai: false,
            timestamp: Some(Utc::now().to_rfc3339()),
        });
        Some(PendingSend {
            local_id,
            input: PostMessageInput {
                content: content.to_string(),
                role,
            },
        })
    }

    /// The server accepted the send; adopt its view of the conversation
    pub fn confirm(&mut self, local_id: u64, conversation: Vec<ChatMessage>) {
        self.pending.retain(|e| e.local_id != Some(local_id));
        self.load(conversation);
    }

    /// The send failed; drop the pending entry and return its text
    pub fn fail(&mut self, local_id: u64) -> Option<String> {
        let idx = self
            .pending
            .iter()
            .position(|e| e.local_id == Some(local_id))?;
        Some(self.pending.remove(idx).content)
    }

    /// Confirmed history followed by pending sends
    pub fn entries(&self) -> impl Iterator<Item = &ThreadEntry> {
        self.confirmed.iter().chain(self.pending.iter())
    }

    pub fn len(&self) -> usize {
        self.confirmed.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while at least one send awaits the bot's reply
    pub fn is_awaiting_reply(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: i64, content: &str, role: MessageRole) -> ChatMessage {
        ChatMessage {
            id,
            room_id: 5,
            sender_id: Some(2),
            content: content.to_string(),
            is_ai: role.is_bot(),
            role,
            message_type: Some("text".into()),
            status: Some("sent".into()),
            timestamp: None,
        }
    }

    #[test]
    fn test_blank_message_not_sent() {
        let mut thread = ChatThread::new(5);
        assert!(thread.begin_send("   ", MessageRole::User).is_none());
        assert!(thread.is_empty());
    }

    #[test]
    fn test_optimistic_send_then_confirm() {
        let mut thread = ChatThread::new(5);
        thread.load(vec![message(1, "Hi", MessageRole::User)]);

        let send = thread.begin_send(" Any side effects? ", MessageRole::User).unwrap();
        assert_eq!(send.input.content, "Any side effects?");
        assert_eq!(thread.len(), 2);
        assert!(thread.is_awaiting_reply());
        assert!(thread.entries().last().unwrap().is_pending());

        thread.confirm(
            send.local_id,
            vec![
                message(1, "Hi", MessageRole::User),
                message(2, "Any side effects?", MessageRole::User),
                message(3, "Mild nausea is common.", MessageRole::Bot),
            ],
        );
        assert_eq!(thread.len(), 3);
        assert!(!thread.is_awaiting_reply());
        assert!(thread.entries().all(|e| !e.is_pending()));
    }

    #[test]
    fn test_failed_send_rolls_back() {
        let mut thread = ChatThread::new(5);
        let send = thread.begin_send("Hello", MessageRole::Patient).unwrap();
        assert_eq!(thread.fail(send.local_id).as_deref(), Some("Hello"));
        assert!(thread.is_empty());
        assert_eq!(thread.fail(send.local_id), None);
    }

    #[test]
    fn test_reload_keeps_other_pending_sends() {
        let mut thread = ChatThread::new(5);
        let first = thread.begin_send("one", MessageRole::User).unwrap();
        let _second = thread.begin_send("two", MessageRole::User).unwrap();

        thread.confirm(first.local_id, vec![message(10, "one", MessageRole::User)]);
        let contents: Vec<_> = thread.entries().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two"]);
        assert!(thread.is_awaiting_reply());
    }

    #[test]
    fn test_load_ignores_other_rooms() {
        let mut thread = ChatThread::new(5);
        let mut other = message(1, "elsewhere", MessageRole::User);
        other.room_id = 6;
        thread.load(vec![other, message(2, "here", MessageRole::User)]);
        assert_eq!(thread.len(), 1);
    }
}
