//! PostgREST filter store.
//!
//! Speaks the hosted product's store API: a PostgREST surface exposing
//! `books` and `filters` tables. Every request carries the project API
//! key as both `apikey` and bearer token, matching the service's
//! convention.

use super::FilterStore;
use crate::models::{BookId, BookRecord};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Environment variable naming the store base URL.
pub const ENV_STORE_URL: &str = "PURLI_STORE_URL";
/// Environment variable naming the store API key.
pub const ENV_STORE_KEY: &str = "PURLI_STORE_KEY";

#[derive(Debug, Deserialize)]
struct BookRow {
    id: String,
    user_id: String,
    title: String,
    author: String,
}

#[derive(Debug, Deserialize)]
struct FilterRow {
    content: Value,
}

/// HTTP filter store speaking PostgREST conventions.
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    /// Creates a store for the given base URL and API key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Creates a store from `PURLI_STORE_URL` and `PURLI_STORE_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is unset.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(ENV_STORE_URL)
            .map_err(|_| Error::operation("rest_store_from_env", format!("{ENV_STORE_URL} is not set")))?;
        let api_key = std::env::var(ENV_STORE_KEY)
            .map_err(|_| Error::operation("rest_store_from_env", format!("{ENV_STORE_KEY} is not set")))?;
        Ok(Self::new(base_url, api_key))
    }

    /// Returns the table endpoint URL.
    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url.trim_end_matches('/'))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn get_rows<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let request = self.authorized(self.client.get(self.endpoint(table)).query(query));
        let response = request
            .send()
            .await
            .map_err(|e| Error::operation(operation, e))?
            .error_for_status()
            .map_err(|e| Error::operation(operation, e))?;
        response
            .json()
            .await
            .map_err(|e| Error::operation(operation, e))
    }
}

#[async_trait]
impl FilterStore for RestStore {
    async fn find_book(
        &self,
        title: &str,
        author: &str,
        user_id: &str,
    ) -> Result<Option<BookRecord>> {
        let rows: Vec<BookRow> = self
            .get_rows(
                "find_book",
                "books",
                &[
                    ("select", "id,user_id,title,author".to_string()),
                    ("user_id", eq(user_id)),
                    ("title", eq(title)),
                    ("author", eq(author)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next().map(|row| BookRecord {
            id: BookId::new(row.id),
            user_id: row.user_id,
            title: row.title,
            author: row.author,
        }))
    }

    async fn fetch_document(&self, book_id: &BookId) -> Result<Option<Value>> {
        let rows: Vec<FilterRow> = self
            .get_rows(
                "fetch_document",
                "filters",
                &[
                    ("select", "content".to_string()),
                    ("book_id", eq(book_id.as_str())),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next().map(|row| row.content))
    }

    async fn create_document(&self, book_id: &BookId, document: &Value) -> Result<()> {
        let body = json!({
            "book_id": book_id.as_str(),
            "content": document,
        });
        let request = self
            .authorized(self.client.post(self.endpoint("filters")))
            .header("Prefer", "return=minimal")
            .json(&body);

        request
            .send()
            .await
            .map_err(|e| Error::operation("create_document", e))?
            .error_for_status()
            .map_err(|e| Error::operation("create_document", e))?;
        Ok(())
    }
}

/// Formats a PostgREST equality filter value.
fn eq(value: &str) -> String {
    format!("eq.{value}")
}

fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!("Failed to build REST store HTTP client: {err}");
            reqwest::Client::new()
        })
}
