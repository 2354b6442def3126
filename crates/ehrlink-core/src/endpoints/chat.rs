use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::chat::ChatThread;
use crate::models::{
    ChatMessage, ChatRoom, ChatRoomInput, MessageRole, PostMessageInput, PostMessageResponse,
    SendMessageInput,
};

impl ApiClient {
    pub async fn list_rooms(&self) -> Result<Vec<ChatRoom>, ApiError> {
        self.get_json("/chat/rooms").await
    }

    pub async fn create_room(&self, input: &ChatRoomInput) -> Result<ChatRoom, ApiError> {
        self.post_json("/chat/rooms", input).await
    }

    pub async fn join_room(&self, room_id: i64) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post_json(&format!("/chat/rooms/{}/participants", room_id), &serde_json::json!({}))
            .await?;
        Ok(())
    }

    pub async fn room_messages(&self, room_id: i64) -> Result<Vec<ChatMessage>, ApiError> {
        self.get_json(&format!("/chat/rooms/{}/messages", room_id))
            .await
    }

    /// Plain room message; no bot reply is generated
    pub async fn send_message(&self, room_id: i64, input: &SendMessageInput) -> Result<ChatMessage, ApiError> {
        self.post_json(&format!("/chat/rooms/{}/messages", room_id), input)
            .await
    }

    /// Post a message and get the bot's reply with the updated conversation
    pub async fn post_message(
        &self,
        room_id: i64,
        input: &PostMessageInput,
    ) -> Result<PostMessageResponse, ApiError> {
        self.post_json(&format!("/chat/rooms/{}/post_message", room_id), input)
            .await
    }

    /// Reload a thread from the server
    pub async fn sync_thread(&self, thread: &mut ChatThread) -> Result<(), ApiError> {
        let messages = self.room_messages(thread.room_id()).await?;
        thread.load(messages);
        Ok(())
    }

    /// Send through a thread: the message is shown as pending right away and
    /// either reconciled with the server conversation or rolled back.
    ///
    /// Returns the bot reply, or `None` for a blank message.
    pub async fn send_to_thread(
        &self,
        thread: &mut ChatThread,
        content: &str,
        role: MessageRole,
    ) -> Result<Option<String>, ApiError> {
        let Some(send) = thread.begin_send(content, role) else {
            return Ok(None);
        };

        match self.post_message(thread.room_id(), &send.input).await {
            Ok(response) => {
                debug!(room_id = thread.room_id(), messages = response.conversation.len(), "Message delivered");
                thread.confirm(send.local_id, response.conversation);
                Ok(Some(response.bot_reply.unwrap_or_default()))
            }
            Err(e) => {
                thread.fail(send.local_id);
                Err(e)
            }
        }
    }
}
