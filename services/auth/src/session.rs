//! Session management using Redis
//!
//! A session is a JSON [`SessionData`] blob stored under `session:<id>`. The
//! id travels in a signed cookie.

use anyhow::Result;
use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use common::cache::RedisPool;
use rand::{Rng, distributions::Alphanumeric};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::{config::SessionConfig, models::SessionData};

const SESSION_ID_LEN: usize = 43;

/// Storage of session payloads keyed by session id
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save a session, replacing any previous payload under the same id
    async fn save(&self, id: &str, data: &SessionData, ttl: Duration) -> Result<()>;

    /// Load a session if it exists and has not expired
    async fn load(&self, id: &str) -> Result<Option<SessionData>>;

    /// Delete a session; deleting an unknown id is not an error
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Session store backed by Redis keys with a TTL
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_pool: RedisPool,
}

impl RedisSessionStore {
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }
}

fn session_key(id: &str) -> String {
    format!("session:{}", id)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, id: &str, data: &SessionData, ttl: Duration) -> Result<()> {
        let value = serde_json::to_string(data)?;
        // Redis rejects a zero expiry
        let ttl_seconds = ttl.as_secs().max(1);
        self.redis_pool
            .set(&session_key(id), &value, Some(ttl_seconds))
            .await?;
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<SessionData>> {
        match self.redis_pool.get(&session_key(id)).await? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.redis_pool.delete(&session_key(id)).await?;
        Ok(())
    }
}

/// Session manager for handling user sessions and their cookies
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    cookie_name: String,
    ttl: Duration,
    secure: bool,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            cookie_name: config.cookie_name.clone(),
            ttl: config.ttl(),
            secure: config.secure,
        }
    }

    /// Start a fresh session holding `data` and attach its cookie
    ///
    /// A session already referenced by the request cookie is deleted first,
    /// so every login gets a new id.
    pub async fn establish(
        &self,
        jar: SignedCookieJar,
        data: &SessionData,
    ) -> Result<SignedCookieJar> {
        if let Some(previous) = jar.get(&self.cookie_name) {
            self.store.delete(previous.value()).await?;
        }

        let id = generate_session_id();
        self.store.save(&id, data, self.ttl).await?;
        info!("Created session for user: {}", data.username);

        Ok(jar.add(self.session_cookie(id)))
    }

    /// End the session referenced by the request cookie, if any
    pub async fn destroy(&self, jar: SignedCookieJar) -> Result<SignedCookieJar> {
        let Some(cookie) = jar.get(&self.cookie_name) else {
            return Ok(jar);
        };

        if let Some(data) = self.store.load(cookie.value()).await? {
            info!("Deleting session for user: {}", data.username);
        }
        self.store.delete(cookie.value()).await?;

        Ok(jar.remove(Cookie::build((self.cookie_name.clone(), "")).path("/")))
    }

    fn session_cookie(&self, id: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }
}

fn generate_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
