use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemedicineSession {
    pub id: i64,
    pub appointment_id: Option<i64>,
    pub room_id: Option<i64>,
    #[serde(alias = "session_url")]
    pub video_url: Option<String>,
    #[serde(alias = "start_time")]
    pub started_at: Option<String>,
    #[serde(alias = "end_time")]
    pub ended_at: Option<String>,
    pub status: Option<String>,
}

impl TelemedicineSession {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none() && self.status.as_deref() != Some("ended")
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
