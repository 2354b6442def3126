use crate::api::{ApiClient, ApiError};
use crate::models::{PasswordChange, ProfileUpdate, User};

impl ApiClient {
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.get_json("/auth/profile").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.put_json("/auth/profile", update).await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post_json("/auth/change-password", change).await?;
        Ok(())
    }

    /// All accounts; admin only on the backend
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/auth/users").await
    }
}
