use anyhow::Result;

use super::ApiClient;
use crate::core::model::UserProfile;

impl ApiClient {
    pub async fn me(&self) -> Result<UserProfile> {
        self.get("/api/user/me").await
    }
}
