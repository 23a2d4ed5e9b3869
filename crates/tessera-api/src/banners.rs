// Banner endpoints.

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Banner, BannerPayload, Envelope, ListQuery, Message, Page};

impl ApiClient {
    pub async fn list_banners(&self, query: &ListQuery) -> Result<Page<Banner>, Error> {
        self.get_with_query("banners", query).await
    }

    pub async fn get_banner(&self, id: u64) -> Result<Banner, Error> {
        let env: Envelope<Banner> = self.get(&format!("banners/{id}")).await?;
        Ok(env.data)
    }

    /// Create a banner. The backend requires a title (422 otherwise).
    pub async fn create_banner(&self, payload: &BannerPayload) -> Result<Banner, Error> {
        let env: Envelope<Banner> = self.post("banners", payload).await?;
        Ok(env.data)
    }

    pub async fn update_banner(&self, id: u64, payload: &BannerPayload) -> Result<Banner, Error> {
        let env: Envelope<Banner> = self.post(&format!("banners/{id}/update"), payload).await?;
        Ok(env.data)
    }

    pub async fn delete_banner(&self, id: u64) -> Result<String, Error> {
        let msg: Message = self.delete(&format!("banners/{id}")).await?;
        Ok(msg.message)
    }

    /// Toggle banner visibility.
    pub async fn toggle_banner(&self, id: u64, is_active: bool) -> Result<Banner, Error> {
        #[derive(serde::Serialize)]
        struct Body {
            is_active: bool,
        }

        let env: Envelope<Banner> = self
            .post(&format!("banners/{id}/toggle-status"), &Body { is_active })
            .await?;
        Ok(env.data)
    }
}
