use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{SessionInput, TelemedicineSession};

impl ApiClient {
    /// Sessions of the logged-in user
    pub async fn list_video_sessions(&self) -> Result<Vec<TelemedicineSession>, ApiError> {
        self.get_json("/video/").await
    }

    pub async fn list_all_video_sessions(&self) -> Result<Vec<TelemedicineSession>, ApiError> {
        self.get_json("/video/all_sessions").await
    }

    pub async fn get_video_session(&self, id: i64) -> Result<TelemedicineSession, ApiError> {
        self.get_json(&format!("/video/{}", id)).await
    }

    pub async fn create_video_session(&self, input: &SessionInput) -> Result<TelemedicineSession, ApiError> {
        self.post_json("/video/", input).await
    }

    pub async fn update_video_session(
        &self,
        id: i64,
        input: &SessionInput,
    ) -> Result<TelemedicineSession, ApiError> {
        self.put_json(&format!("/video/{}", id), input).await
    }

    pub async fn delete_video_session(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/video/{}", id)).await
    }

    // ===== Telemedicine in chat rooms =====

    /// Open a video session attached to a chat room
    pub async fn start_telemed_session(
        &self,
        room_id: i64,
        input: &SessionInput,
    ) -> Result<TelemedicineSession, ApiError> {
        self.post_json(&format!("/chat/rooms/{}/telemed/start", room_id), input)
            .await
    }

    /// Close a session opened with `start_telemed_session`. Sent without a body.
    pub async fn end_telemed_session(&self, session_id: i64) -> Result<(), ApiError> {
        self.execute(ApiRequest::post(format!("/chat/telemed/{}/end", session_id)))
            .await
    }
}
