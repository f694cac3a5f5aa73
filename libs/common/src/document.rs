//! Document collections stored as PostgreSQL JSONB rows
//!
//! A collection is a table with one JSON document per row. Documents are
//! inserted whole and looked up by exact match on a top-level text field.

use serde::{Serialize, de::DeserializeOwned};
use sqlx::{PgPool, Row};
use std::future::Future;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::error::{DatabaseError, DatabaseResult};

/// Handle to a single document collection
#[derive(Debug, Clone)]
pub struct Collection {
    pool: PgPool,
    name: String,
    timeout: Duration,
}

impl Collection {
    /// Create a handle for the collection `name`
    ///
    /// The name is interpolated into SQL, so only identifiers made of ASCII
    /// letters, digits and underscores (not starting with a digit) are accepted.
    pub fn new(pool: PgPool, name: impl Into<String>, timeout: Duration) -> DatabaseResult<Self> {
        let name = name.into();
        validate_collection_name(&name)?;

        Ok(Self {
            pool,
            name,
            timeout,
        })
    }

    /// Name of the collection
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create the backing table if it does not exist yet
    pub async fn ensure(&self) -> DatabaseResult<()> {
        let statement = create_statement(&self.name);

        self.bounded(sqlx::query(&statement).execute(&self.pool))
            .await?
            .map_err(DatabaseError::Migration)?;

        info!("Collection {} is ready", self.name);
        Ok(())
    }

    /// Insert a document and return its generated id
    pub async fn insert_one<T: Serialize>(&self, document: &T) -> DatabaseResult<Uuid> {
        let id = Uuid::new_v4();
        let doc = serde_json::to_value(document)?;
        let statement = insert_statement(&self.name);

        self.bounded(
            sqlx::query(&statement)
                .bind(id)
                .bind(doc)
                .execute(&self.pool),
        )
        .await?
        .map_err(DatabaseError::Query)?;

        Ok(id)
    }

    /// Find the first inserted document whose `field` equals `value`
    pub async fn find_one<T: DeserializeOwned>(
        &self,
        field: &str,
        value: &str,
    ) -> DatabaseResult<Option<T>> {
        let statement = find_statement(&self.name);

        let row = self
            .bounded(
                sqlx::query(&statement)
                    .bind(field)
                    .bind(value)
                    .fetch_optional(&self.pool),
            )
            .await?
            .map_err(DatabaseError::Query)?;

        match row {
            Some(row) => {
                let doc: serde_json::Value = row.try_get("doc").map_err(DatabaseError::Query)?;
                Ok(Some(serde_json::from_value(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn bounded<F, T>(&self, operation: F) -> DatabaseResult<T>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.timeout, operation)
            .await
            .map_err(|_| DatabaseError::Timeout(self.timeout))
    }
}

// Names are always quoted so reserved words such as `user` stay usable.
fn create_statement(name: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{}" (
            id UUID PRIMARY KEY,
            seq BIGSERIAL NOT NULL,
            doc JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
        name
    )
}

fn insert_statement(name: &str) -> String {
    format!(r#"INSERT INTO "{}" (id, doc) VALUES ($1, $2)"#, name)
}

fn find_statement(name: &str) -> String {
    format!(
        r#"
        SELECT doc
        FROM "{}"
        WHERE doc ->> $1 = $2
        ORDER BY seq
        LIMIT 1
        "#,
        name
    )
}

fn validate_collection_name(name: &str) -> DatabaseResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DatabaseError::Configuration(format!(
            "Invalid collection name: {:?}",
            name
        )))
    }
}
