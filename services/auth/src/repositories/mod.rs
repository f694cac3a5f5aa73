//! Persistence for user records

mod user;

pub use user::UserRepository;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::User;

/// Storage of user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user. Duplicate phone numbers are accepted.
    async fn insert(&self, user: &User) -> Result<()>;

    /// Find the earliest registered user with this phone number
    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<User>>;
}
