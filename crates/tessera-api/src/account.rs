// Account-settings endpoints for the signed-in user.

use secrecy::{ExposeSecret, SecretString};

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Envelope, Message, User};

impl ApiClient {
    /// The signed-in user's account settings.
    pub async fn account(&self) -> Result<User, Error> {
        let env: Envelope<User> = self.get("account").await?;
        Ok(env.data)
    }

    /// Update the signed-in user's profile fields.
    pub async fn update_account(
        &self,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User, Error> {
        #[derive(serde::Serialize)]
        struct Body<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            email: Option<&'a str>,
        }

        let env: Envelope<User> = self
            .post("account/update", &Body { name, email })
            .await?;
        Ok(env.data)
    }

    /// Change the signed-in user's password.
    ///
    /// The backend validates the current password and the confirmation
    /// match; mismatches come back as a 422.
    pub async fn change_password(
        &self,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<String, Error> {
        #[derive(serde::Serialize)]
        struct Body<'a> {
            current_password: &'a str,
            new_password: &'a str,
            new_password_confirmation: &'a str,
        }

        let msg: Message = self
            .post(
                "account/password",
                &Body {
                    current_password: current.expose_secret(),
                    new_password: new.expose_secret(),
                    new_password_confirmation: new.expose_secret(),
                },
            )
            .await?;
        Ok(msg.message)
    }
}
