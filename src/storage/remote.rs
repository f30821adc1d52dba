//! HTTP client for a store node.

use super::protocol::*;
use super::store::TableStore;
use super::types::{Item, QueryRequest, StoreError, TableDescription, TableSchema};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// `TableStore` backed by a remote store node.
///
/// Each call is a single attempt. Connection failures, timeouts and 5xx replies surface as
/// `StoreError::Transport` so callers can retry them.
pub struct RemoteStore {
    base_url: String,
    region: Option<String>,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: &str, region: Option<String>) -> Self {
        let cleaned = base_url.trim_end_matches('/');
        let base_url = if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
            cleaned.to_string()
        } else {
            format!("http://{}", cleaned)
        };

        Self {
            base_url,
            region,
            timeout: DEFAULT_TIMEOUT,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn table_url(&self, name: &str, suffix: &str) -> String {
        format!("{}{}/{}{}", self.base_url, ENDPOINT_TABLES, name, suffix)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        let request = match &self.region {
            Some(region) => request.header(REGION_HEADER, region),
            None => request,
        };

        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| StoreError::Serialization(e.to_string()));
        }

        match response.json::<ErrorResponse>().await {
            Ok(body) => Err(body.into_store_error()),
            Err(_) if status.is_server_error() => Err(StoreError::Transport(format!(
                "store node returned {}",
                status
            ))),
            Err(_) => Err(StoreError::Rejected(format!(
                "store node returned {}",
                status
            ))),
        }
    }
}

#[async_trait]
impl TableStore for RemoteStore {
    async fn describe_table(&self, name: &str) -> Result<TableDescription, StoreError> {
        self.send(self.http_client.get(self.table_url(name, "")))
            .await
    }

    async fn create_table(&self, schema: TableSchema) -> Result<TableDescription, StoreError> {
        let url = self.table_url(&schema.name, "");
        self.send(self.http_client.put(url).json(&schema)).await
    }

    async fn batch_write(&self, table: &str, items: &[Item]) -> Result<(), StoreError> {
        let payload = BatchWriteRequest {
            items: items.to_vec(),
        };
        let response: BatchWriteResponse = self
            .send(
                self.http_client
                    .post(self.table_url(table, ENDPOINT_BATCH_SUFFIX))
                    .json(&payload),
            )
            .await?;

        if response.written != items.len() {
            return Err(StoreError::Transport(format!(
                "store node acknowledged {} of {} items",
                response.written,
                items.len()
            )));
        }
        Ok(())
    }

    async fn query(&self, request: &QueryRequest) -> Result<Vec<Item>, StoreError> {
        let response: QueryResponse = self
            .send(
                self.http_client
                    .post(self.table_url(&request.table, ENDPOINT_QUERY_SUFFIX))
                    .json(request),
            )
            .await?;
        Ok(response.items)
    }
}
