//! In-memory collaborators for handler and session tests

use anyhow::Result;
use async_trait::async_trait;
use axum_extra::extract::cookie::Key;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{
    config::SessionConfig,
    models::{SessionData, User},
    password::{PasswordService, fast_params},
    repositories::UserStore,
    session::{SessionManager, SessionStore},
    state::AppState,
};

/// User store keeping records in insertion order
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> Result<()> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.phone_number == phone_number)
            .cloned())
    }
}

/// User store whose every call fails, as an unreachable database would
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn insert(&self, _user: &User) -> Result<()> {
        anyhow::bail!("Database operation timed out")
    }

    async fn find_by_phone_number(&self, _phone_number: &str) -> Result<Option<User>> {
        anyhow::bail!("Database operation timed out")
    }
}

/// Session store keeping payloads and their TTLs in a map
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, (SessionData, Duration)>>,
}

impl MemorySessionStore {
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn ttl_of(&self, id: &str) -> Option<Duration> {
        self.sessions.lock().unwrap().get(id).map(|(_, ttl)| *ttl)
    }

    pub fn usernames(&self) -> Vec<String> {
        self.sessions
            .lock()
            .unwrap()
            .values()
            .map(|(data, _)| data.username.clone())
            .collect()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, id: &str, data: &SessionData, ttl: Duration) -> Result<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(id.to_string(), (data.clone(), ttl));
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<SessionData>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(id)
            .map(|(data, _)| data.clone()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.sessions.lock().unwrap().remove(id);
        Ok(())
    }
}

/// Session store whose every call fails
pub struct FailingSessionStore;

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn save(&self, _id: &str, _data: &SessionData, _ttl: Duration) -> Result<()> {
        anyhow::bail!("Redis operation timed out")
    }

    async fn load(&self, _id: &str) -> Result<Option<SessionData>> {
        anyhow::bail!("Redis operation timed out")
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        anyhow::bail!("Redis operation timed out")
    }
}

pub fn test_key() -> Key {
    Key::from(&[7u8; 64][..])
}

pub fn test_session_config() -> SessionConfig {
    SessionConfig {
        secret: "x".repeat(64),
        cookie_name: "session".to_string(),
        ttl_seconds: 86400,
        secure: false,
    }
}

/// Application state wired to the given stores with a cheap hasher
pub fn test_state(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>) -> AppState {
    AppState {
        users,
        sessions: SessionManager::new(sessions, &test_session_config()),
        passwords: PasswordService::with_params(fast_params()).unwrap(),
        cookie_key: test_key(),
    }
}
