//! Lenient form extraction
//!
//! Handlers read their fields the way an HTML form posts them, whatever the
//! request looks like. URL-encoded and multipart bodies are decoded, query
//! string parameters are merged in behind them, and anything unreadable
//! leaves the affected fields empty instead of rejecting the request.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{HeaderMap, header},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::convert::Infallible;
use tracing::warn;

/// Form fields decoded from the body and query string of a request
///
/// When a key appears more than once the first value wins, and body values
/// come before query string values.
#[derive(Debug)]
pub struct FormFields<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormFields<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = req.uri().query().map(str::to_string);

        let mut pairs = match BodyKind::of(req.headers()) {
            BodyKind::UrlEncoded => read_urlencoded(req, state).await,
            BodyKind::Multipart => read_multipart(req, state).await,
            BodyKind::Other => Vec::new(),
        };

        if let Some(query) = query {
            pairs.extend(url::form_urlencoded::parse(query.as_bytes()).into_owned());
        }

        Ok(FormFields(from_pairs(pairs)))
    }
}

enum BodyKind {
    UrlEncoded,
    Multipart,
    Other,
}

impl BodyKind {
    fn of(headers: &HeaderMap) -> Self {
        let essence = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some("application/x-www-form-urlencoded") => BodyKind::UrlEncoded,
            Some("multipart/form-data") => BodyKind::Multipart,
            _ => BodyKind::Other,
        }
    }
}

async fn read_urlencoded<S>(req: Request, state: &S) -> Vec<(String, String)>
where
    S: Send + Sync,
{
    match Bytes::from_request(req, state).await {
        Ok(body) => url::form_urlencoded::parse(&body).into_owned().collect(),
        Err(e) => {
            warn!("Failed to read form body: {}", e);
            Vec::new()
        }
    }
}

async fn read_multipart<S>(req: Request, state: &S) -> Vec<(String, String)>
where
    S: Send + Sync,
{
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(e) => {
            warn!("Failed to read multipart body: {}", e);
            return Vec::new();
        }
    };

    let mut pairs = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                break;
            }
        };

        // File uploads are not form values
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.text().await {
            Ok(value) => pairs.push((name, value)),
            Err(e) => {
                warn!("Failed to read multipart field {}: {}", name, e);
                break;
            }
        }
    }

    pairs
}

fn from_pairs<T>(pairs: Vec<(String, String)>) -> T
where
    T: DeserializeOwned + Default,
{
    let mut fields = Map::new();
    for (key, value) in pairs {
        fields.entry(key).or_insert(Value::String(value));
    }

    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        warn!("Failed to decode form fields: {}", e);
        T::default()
    })
}
