//! Item store backed by a hosted PostgREST-style table API
//!
//! Rows live in `{url}/rest/v1/{table}`. Every request carries the public
//! API key both as `apikey` and as a bearer token. Writes ask for the
//! affected rows back (`Prefer: return=representation`) so that updating or
//! deleting a missing id can be told apart from success.

use acctbook_config::{StoreBackend, StoreConfig};
use acctbook_core::{Item, ItemStore, MemoryItemStore, NewItem, StoreError, StoreRef};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use std::sync::Arc;
use std::time::Duration;

const PREFER_REPRESENTATION: &str = "return=representation";

/// Build the store selected by the configuration
pub fn connect(config: &StoreConfig) -> Result<StoreRef, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            log::warn!("Using in-memory item store; items are lost on restart");
            Ok(Arc::new(MemoryItemStore::new()))
        }
        StoreBackend::Rest => {
            let store = RestItemStore::new(config)?;
            log::info!("Using hosted item store at {}", store.table_url());
            Ok(Arc::new(store))
        }
    }
}

/// HTTP client for the hosted items table
#[derive(Debug, Clone)]
pub struct RestItemStore {
    client: reqwest::Client,
    table_url: String,
}

impl RestItemStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let key = HeaderValue::from_str(&config.api_key).map_err(|_| StoreError::Request {
            message: "api key contains invalid header characters".to_string(),
        })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|_| {
            StoreError::Request {
                message: "api key contains invalid header characters".to_string(),
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Request {
                message: format!("failed to build http client: {}", e),
            })?;

        Ok(Self {
            client,
            table_url: table_url(&config.url, &config.table),
        })
    }

    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    fn row_url(&self, id: i64) -> String {
        format!("{}?id=eq.{}", self.table_url, id)
    }

    /// Send a request and decode the returned rows
    async fn rows(&self, request: reqwest::RequestBuilder) -> Result<Vec<Item>, StoreError> {
        let response = request.send().await.map_err(request_error)?;
        let status = response.status();
        let body = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            log::debug!("Store responded {}: {}", status, body);
            return Err(StoreError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        decode_rows(&body)
    }
}

#[async_trait]
impl ItemStore for RestItemStore {
    async fn fetch_all(&self) -> Result<Vec<Item>, StoreError> {
        let url = format!("{}?select=*", self.table_url);
        log::debug!("GET {}", url);
        self.rows(self.client.get(url)).await
    }

    async fn fetch(&self, id: i64) -> Result<Item, StoreError> {
        let url = format!("{}&select=*", self.row_url(id));
        log::debug!("GET {}", url);
        let rows = self.rows(self.client.get(url)).await?;
        first_row(rows, id)
    }

    async fn insert(&self, item: NewItem) -> Result<Item, StoreError> {
        log::debug!("POST {}", self.table_url);
        let request = self
            .client
            .post(&self.table_url)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&item);
        let rows = self.rows(request).await?;
        rows.into_iter().next().ok_or_else(|| StoreError::Decode {
            message: "insert returned no row".to_string(),
        })
    }

    async fn update(&self, id: i64, item: NewItem) -> Result<Item, StoreError> {
        let url = self.row_url(id);
        log::debug!("PATCH {}", url);
        let request = self
            .client
            .patch(url)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&item);
        let rows = self.rows(request).await?;
        first_row(rows, id)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let url = self.row_url(id);
        log::debug!("DELETE {}", url);
        let request = self
            .client
            .delete(url)
            .header("Prefer", PREFER_REPRESENTATION);
        let rows = self.rows(request).await?;
        first_row(rows, id).map(|_| ())
    }
}

fn table_url(base: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base.trim_end_matches('/'), table)
}

fn request_error(error: reqwest::Error) -> StoreError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("could not connect: {}", error)
    } else {
        error.to_string()
    };
    StoreError::Request { message }
}

/// PostgREST reports errors as `{"message": ...}`; fall back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn decode_rows(body: &str) -> Result<Vec<Item>, StoreError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body).map_err(|e| StoreError::Decode {
        message: e.to_string(),
    })
}

/// An empty representation means no row had this id
fn first_row(rows: Vec<Item>, id: i64) -> Result<Item, StoreError> {
    rows.into_iter().next().ok_or(StoreError::NotFound { id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use acctbook_core::ItemType;
    use rust_decimal::Decimal;

    fn rest_config() -> StoreConfig {
        StoreConfig {
            backend: StoreBackend::Rest,
            url: "https://demo.supabase.co/".to_string(),
            api_key: "anon-key".to_string(),
            table: "items".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_table_and_row_urls() {
        let store = RestItemStore::new(&rest_config()).unwrap();
        assert_eq!(store.table_url(), "https://demo.supabase.co/rest/v1/items");
        assert_eq!(store.row_url(7), "https://demo.supabase.co/rest/v1/items?id=eq.7");
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let mut config = rest_config();
        config.api_key = "bad\nkey".to_string();
        assert!(matches!(RestItemStore::new(&config), Err(StoreError::Request { .. })));
    }

    #[test]
    fn test_decode_rows() {
        let body = r#"[
            {"id": 1, "description": "Consulting Fee", "type": "service", "price": 100, "account": "sales", "discount": null, "tax": "VAT19"},
            {"id": 2, "description": "Widget A", "type": "good", "price": 49.99, "account": "other", "discount": 5, "tax": ""}
        ]"#;
        let rows = decode_rows(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item_type, ItemType::Service);
        assert_eq!(rows[1].price_text(), "49.99");
        assert_eq!(rows[1].discount, Some(Decimal::from(5)));
        assert!(decode_rows("").unwrap().is_empty());
        assert!(matches!(decode_rows("{not json"), Err(StoreError::Decode { .. })));
    }

    #[test]
    fn test_decode_rows_mixed_case_type() {
        let body = r#"[
            {"id": 1, "description": "Consulting Fee", "type": "service", "price": 100},
            {"id": 2, "description": "Widget A", "type": "Good", "price": 50}
        ]"#;
        let rows = decode_rows(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].item_type, ItemType::Good);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"code":"42P01","message":"relation \"items\" does not exist"}"#),
            "relation \"items\" does not exist"
        );
        assert_eq!(error_message(" Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_first_row_missing_is_not_found() {
        assert_eq!(first_row(Vec::new(), 3), Err(StoreError::NotFound { id: 3 }));
    }

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let store = connect(&StoreConfig::default()).unwrap();
        assert!(store.fetch_all().await.unwrap().is_empty());
    }
}
