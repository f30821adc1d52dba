use super::types::{Item, QueryRequest, StoreError, TableDescription, TableSchema};

use async_trait::async_trait;
use std::sync::Arc;

/// Backend-neutral table store.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn describe_table(&self, name: &str) -> Result<TableDescription, StoreError>;

    /// Fails with `TableAlreadyExists` when the name is taken.
    async fn create_table(&self, schema: TableSchema) -> Result<TableDescription, StoreError>;

    /// Upserts every item by primary key. Later items win over earlier ones with the same key.
    async fn batch_write(&self, table: &str, items: &[Item]) -> Result<(), StoreError>;

    async fn query(&self, request: &QueryRequest) -> Result<Vec<Item>, StoreError>;
}

/// A store paired with the name of a schema-ready table.
#[derive(Clone)]
pub struct TableHandle {
    store: Arc<dyn TableStore>,
    name: String,
}

impl TableHandle {
    pub fn new(store: Arc<dyn TableStore>, name: &str) -> Self {
        Self {
            store,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts a query on this table's partition `partition`.
    pub fn query_partition(&self, partition: String) -> QueryRequest {
        QueryRequest::new(&self.name, partition)
    }

    pub async fn describe(&self) -> Result<TableDescription, StoreError> {
        self.store.describe_table(&self.name).await
    }

    pub async fn batch_write(&self, items: &[Item]) -> Result<(), StoreError> {
        self.store.batch_write(&self.name, items).await
    }

    pub async fn query(&self, request: &QueryRequest) -> Result<Vec<Item>, StoreError> {
        self.store.query(request).await
    }
}

impl std::fmt::Debug for TableHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableHandle")
            .field("name", &self.name)
            .finish()
    }
}
