// Digital-card endpoints.
//
// The backend routes follow its Laravel controller: updates go through
// POST `{id}/update` (not PUT), and image upload is a multipart POST with
// the file under the `image` field.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{
    CardPayload, DigitalCard, Envelope, ImageUpload, ListQuery, Message, Page, StatusToggle,
};

impl ApiClient {
    /// List cards with pagination and optional search.
    pub async fn list_cards(&self, query: &ListQuery) -> Result<Page<DigitalCard>, Error> {
        self.get_with_query("digital-cards", query).await
    }

    /// Fetch a single card by id.
    pub async fn get_card(&self, id: u64) -> Result<DigitalCard, Error> {
        let env: Envelope<DigitalCard> = self.get(&format!("digital-cards/{id}")).await?;
        Ok(env.data)
    }

    /// Create a new card. The backend requires at least
    /// `personalInfo.name` and answers 422 otherwise.
    pub async fn create_card(&self, payload: &CardPayload) -> Result<DigitalCard, Error> {
        let env: Envelope<DigitalCard> = self.post("digital-cards", payload).await?;
        Ok(env.data)
    }

    /// Update an existing card.
    pub async fn update_card(&self, id: u64, payload: &CardPayload) -> Result<DigitalCard, Error> {
        let env: Envelope<DigitalCard> = self
            .post(&format!("digital-cards/{id}/update"), payload)
            .await?;
        Ok(env.data)
    }

    /// Delete a card. Returns the backend's confirmation message.
    pub async fn delete_card(&self, id: u64) -> Result<String, Error> {
        let msg: Message = self.delete(&format!("digital-cards/{id}")).await?;
        Ok(msg.message)
    }

    /// Upload a profile image for a card (multipart, field name `image`).
    pub async fn upload_card_image(
        &self,
        id: u64,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ImageUpload, Error> {
        let url = self.api_url(&format!("digital-cards/{id}/upload-image"));
        debug!("POST {url} (multipart, {} bytes)", bytes.len());

        // The form is rebuilt per attempt so a token-refresh retry does not
        // reuse a consumed body.
        let resp = self
            .execute(|| {
                let part = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(filename.to_owned());
                let form = reqwest::multipart::Form::new().part("image", part);
                self.http().post(url.clone()).multipart(form)
            })
            .await?;
        self.parse(resp).await
    }

    /// Remove a card's profile image.
    pub async fn delete_card_image(&self, id: u64) -> Result<String, Error> {
        let msg: Message = self
            .delete(&format!("digital-cards/{id}/delete-image"))
            .await?;
        Ok(msg.message)
    }

    /// Flip the card's active/public flags.
    pub async fn toggle_card_status(
        &self,
        id: u64,
        toggle: StatusToggle,
    ) -> Result<DigitalCard, Error> {
        let env: Envelope<DigitalCard> = self
            .post(&format!("digital-cards/{id}/toggle-status"), &toggle)
            .await?;
        Ok(env.data)
    }
}
