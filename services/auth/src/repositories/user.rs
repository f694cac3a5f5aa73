//! User repository backed by the document store

use anyhow::Result;
use async_trait::async_trait;
use common::document::Collection;
use tracing::info;

use super::UserStore;
use crate::models::User;

/// Document field holding the phone number
const PHONE_NUMBER_FIELD: &str = "phonenumber";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    users: Collection,
}

impl UserRepository {
    /// Create a new user repository over the given collection
    pub fn new(users: Collection) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        let id = self.users.insert_one(user).await?;
        info!("Stored user {} in collection {}", id, self.users.name());
        Ok(())
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<User>> {
        info!("Finding user by phone number: {}", phone_number);
        let user = self
            .users
            .find_one(PHONE_NUMBER_FIELD, phone_number)
            .await?;
        Ok(user)
    }
}
