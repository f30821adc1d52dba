use crate::items::keys::*;
use crate::storage::store::{TableHandle, TableStore};
use crate::storage::types::*;

use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct ProvisionConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(20),
            timeout: Duration::from_secs(60),
        }
    }
}

/// The single-table paper schema: `PK`/`SK` plus the author, paper-id and keyword indexes.
pub fn paper_table_schema(name: &str) -> TableSchema {
    let index = |index_name: &str, pk: &str, sk: &str| SecondaryIndex {
        name: index_name.to_string(),
        key: KeySchema::new(pk, sk),
        projection: Projection::All,
    };

    TableSchema {
        name: name.to_string(),
        key: KeySchema::new(ATTR_PK, ATTR_SK),
        indexes: vec![
            index(AUTHOR_INDEX, ATTR_GSI1PK, ATTR_GSI1SK),
            index(PAPER_ID_INDEX, ATTR_GSI2PK, ATTR_GSI2SK),
            index(KEYWORD_INDEX, ATTR_GSI3PK, ATTR_GSI3SK),
        ],
        billing_mode: BillingMode::PayPerRequest,
    }
}

pub struct TableProvisioner {
    store: Arc<dyn TableStore>,
    config: ProvisionConfig,
}

impl TableProvisioner {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self::with_config(store, ProvisionConfig::default())
    }

    pub fn with_config(store: Arc<dyn TableStore>, config: ProvisionConfig) -> Self {
        Self { store, config }
    }

    /// Returns a handle to `name`, creating the table first if it does not exist.
    pub async fn ensure_table(&self, name: &str) -> Result<TableHandle, StoreError> {
        match self.store.describe_table(name).await {
            Ok(description) => {
                tracing::info!("Table exists: {}", name);
                warn_on_missing_indexes(&description.schema);
                if description.status != TableStatus::Active {
                    self.wait_until_active(name).await?;
                }
                return Ok(TableHandle::new(self.store.clone(), name));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        tracing::info!("Creating table: {}", name);
        match self.store.create_table(paper_table_schema(name)).await {
            Ok(_) => {}
            Err(StoreError::TableAlreadyExists(_)) => {
                tracing::info!("Table {} was created concurrently, waiting for it", name);
            }
            Err(e) => return Err(e),
        }

        self.wait_until_active(name).await?;
        tracing::info!("Table is active: {}", name);
        Ok(TableHandle::new(self.store.clone(), name))
    }

    async fn wait_until_active(&self, name: &str) -> Result<(), StoreError> {
        let started = Instant::now();

        loop {
            match self.store.describe_table(name).await {
                Ok(description) if description.status == TableStatus::Active => return Ok(()),
                Ok(_) => {}
                // A concurrent creator may not be visible yet on an eventually consistent store.
                Err(e) if e.is_not_found() || e.is_transient() => {
                    tracing::debug!("Waiting for table {}: {}", name, e);
                }
                Err(e) => return Err(e),
            }

            if started.elapsed() >= self.config.timeout {
                return Err(StoreError::TableNotActive(name.to_string()));
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

fn warn_on_missing_indexes(schema: &TableSchema) {
    let expected = paper_table_schema(&schema.name);
    for index in &expected.indexes {
        if schema.index(&index.name) != Some(index) {
            tracing::warn!(
                "Table {} lacks the expected index {}; queries using it will fail",
                schema.name,
                index.name
            );
        }
    }
}
