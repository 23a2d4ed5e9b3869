// User administration endpoints.
//
// Role enforcement is server-side: these routes answer 403 for non-admin
// sessions and the error flows through the normal pipeline.

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Envelope, ListQuery, Message, Page, RegisterUser, User, UserUpdate};

impl ApiClient {
    pub async fn list_users(&self, query: &ListQuery) -> Result<Page<User>, Error> {
        self.get_with_query("users", query).await
    }

    pub async fn get_user(&self, id: u64) -> Result<User, Error> {
        let env: Envelope<User> = self.get(&format!("users/{id}")).await?;
        Ok(env.data)
    }

    /// Register a new user account.
    pub async fn register_user(&self, payload: &RegisterUser) -> Result<User, Error> {
        let env: Envelope<User> = self.post("users", payload).await?;
        Ok(env.data)
    }

    pub async fn update_user(&self, id: u64, payload: &UserUpdate) -> Result<User, Error> {
        let env: Envelope<User> = self.post(&format!("users/{id}/update"), payload).await?;
        Ok(env.data)
    }

    pub async fn delete_user(&self, id: u64) -> Result<String, Error> {
        let msg: Message = self.delete(&format!("users/{id}")).await?;
        Ok(msg.message)
    }
}
