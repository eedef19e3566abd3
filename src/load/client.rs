//! Access to the hosted datastore's REST interface.
//!
//! [`RestStore`] is the seam the importer talks through; [`PostgrestClient`]
//! implements it over blocking HTTP with `apikey` + bearer authentication.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Result, ToolError};

/// Why a single remote call did not produce the expected result. These are
/// recorded per record and never abort the batch on their own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The store answered with a status other than the expected one.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not the expected JSON shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A lookup that should have found a row returned none.
    #[error("no {table} row matched the lookup")]
    NotFound { table: String },
}

/// Equality filter on a column, sent as `column=eq.value`.
pub type Filter<'a> = (&'a str, String);

/// Create and filtered-read access to the store's tables.
pub trait RestStore {
    /// Creates one row; success means the store answered `201 Created`.
    fn insert<T: Serialize>(&mut self, table: &str, row: &T) -> std::result::Result<(), RemoteError>;

    /// Reads the rows matching every filter, projecting `columns`.
    fn select(
        &mut self,
        table: &str,
        filters: &[Filter<'_>],
        columns: &str,
    ) -> std::result::Result<Vec<Value>, RemoteError>;
}

impl<S: RestStore> RestStore for &mut S {
    fn insert<T: Serialize>(&mut self, table: &str, row: &T) -> std::result::Result<(), RemoteError> {
        (**self).insert(table, row)
    }

    fn select(
        &mut self,
        table: &str,
        filters: &[Filter<'_>],
        columns: &str,
    ) -> std::result::Result<Vec<Value>, RemoteError> {
        (**self).select(table, filters, columns)
    }
}

/// Blocking client for a PostgREST endpoint at `<url>/rest/v1`.
pub struct PostgrestClient {
    client: Client,
    base_url: String,
}

impl PostgrestClient {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("apikey"), header_value(&config.service_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", config.service_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("prefer"),
            HeaderValue::from_static("return=minimal"),
        );

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| ToolError::InvalidConfig("service key is not a valid header value".into()))?;
    header.set_sensitive(true);
    Ok(header)
}

impl RestStore for PostgrestClient {
    fn insert<T: Serialize>(&mut self, table: &str, row: &T) -> std::result::Result<(), RemoteError> {
        let response = self
            .client
            .post(self.endpoint(table))
            .json(row)
            .send()
            .map_err(|error| RemoteError::Transport(error.to_string()))?;

        let status = response.status();
        debug!(table, %status, "insert");
        if status != StatusCode::CREATED {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(())
    }

    fn select(
        &mut self,
        table: &str,
        filters: &[Filter<'_>],
        columns: &str,
    ) -> std::result::Result<Vec<Value>, RemoteError> {
        let mut query: Vec<(&str, String)> = filters
            .iter()
            .map(|(column, value)| (*column, format!("eq.{value}")))
            .collect();
        query.push(("select", columns.to_string()));

        let response = self
            .client
            .get(self.endpoint(table))
            .query(&query)
            .send()
            .map_err(|error| RemoteError::Transport(error.to_string()))?;

        let status = response.status();
        debug!(table, %status, "select");
        if status != StatusCode::OK {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        response
            .json::<Vec<Value>>()
            .map_err(|error| RemoteError::Malformed(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url_and_table() {
        let client = PostgrestClient::new(&StoreConfig {
            url: "https://store.example/".into(),
            service_key: "key".into(),
        })
        .unwrap();
        assert_eq!(client.endpoint("users"), "https://store.example/rest/v1/users");
    }

    #[test]
    fn keys_that_cannot_be_headers_are_rejected() {
        let result = PostgrestClient::new(&StoreConfig {
            url: "https://store.example".into(),
            service_key: "bad\nkey".into(),
        });
        assert!(matches!(result, Err(ToolError::InvalidConfig(_))));
    }
}
