//! In-process table store.
//!
//! Tables live in a `DashMap`; every index (the primary key included) maps a partition key
//! to a `BTreeMap` ordered by that index's sort key. Partitions lock independently, so
//! concurrent loaders writing different partitions do not contend.

use super::store::TableStore;
use super::types::*;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Largest number of items accepted by one `batch_write` call.
pub const MAX_BATCH_ITEMS: usize = 25;

/// Index sort key, then the base item's primary key to keep entries unique.
type EntryKey = (String, String, String);

struct IndexData {
    key: KeySchema,
    partitions: DashMap<String, BTreeMap<EntryKey, Item>>,
}

impl IndexData {
    fn new(key: KeySchema) -> Self {
        Self {
            key,
            partitions: DashMap::new(),
        }
    }

    fn locate(&self, item: &Item, base_pk: &str, base_sk: &str) -> Option<(String, EntryKey)> {
        let partition = string_attr(item, &self.key.partition_attr)?;
        let sort = string_attr(item, &self.key.sort_attr)?;
        Some((
            partition.to_string(),
            (sort.to_string(), base_pk.to_string(), base_sk.to_string()),
        ))
    }

    fn insert(&self, item: &Item, base_pk: &str, base_sk: &str) -> Option<Item> {
        let (partition, entry_key) = self.locate(item, base_pk, base_sk)?;
        self.partitions
            .entry(partition)
            .or_default()
            .insert(entry_key, item.clone())
    }

    fn remove(&self, item: &Item, base_pk: &str, base_sk: &str) {
        let Some((partition, entry_key)) = self.locate(item, base_pk, base_sk) else {
            return;
        };
        if let Some(mut entries) = self.partitions.get_mut(&partition) {
            entries.remove(&entry_key);
        }
        self.partitions
            .remove_if(&partition, |_, entries| entries.is_empty());
    }

    fn query(
        &self,
        partition: &str,
        sort: Option<&SortCondition>,
        forward: bool,
        limit: Option<usize>,
    ) -> Vec<Item> {
        let Some(entries) = self.partitions.get(partition) else {
            return Vec::new();
        };
        let limit = limit.unwrap_or(usize::MAX);
        let matching = entries
            .iter()
            .filter(|(key, _)| sort.is_none_or(|condition| condition.matches(&key.0)));

        if forward {
            matching.take(limit).map(|(_, item)| item.clone()).collect()
        } else {
            matching.rev().take(limit).map(|(_, item)| item.clone()).collect()
        }
    }

    fn len(&self) -> usize {
        self.partitions.iter().map(|entry| entry.value().len()).sum()
    }
}

struct MemoryTable {
    schema: TableSchema,
    created_at: Instant,
    activation_delay: Duration,
    primary: IndexData,
    secondary: HashMap<String, IndexData>,
}

impl MemoryTable {
    fn new(schema: TableSchema, activation_delay: Duration) -> Self {
        let secondary = schema
            .indexes
            .iter()
            .map(|index| (index.name.clone(), IndexData::new(index.key.clone())))
            .collect();

        Self {
            primary: IndexData::new(schema.key.clone()),
            schema,
            created_at: Instant::now(),
            activation_delay,
            secondary,
        }
    }

    fn status(&self) -> TableStatus {
        if self.created_at.elapsed() >= self.activation_delay {
            TableStatus::Active
        } else {
            TableStatus::Creating
        }
    }

    fn describe(&self) -> TableDescription {
        TableDescription {
            schema: self.schema.clone(),
            status: self.status(),
            item_count: self.primary.len(),
        }
    }

    fn ensure_active(&self) -> Result<(), StoreError> {
        match self.status() {
            TableStatus::Active => Ok(()),
            TableStatus::Creating => Err(StoreError::TableNotActive(self.schema.name.clone())),
        }
    }

    fn primary_key(&self, item: &Item) -> Result<(String, String), StoreError> {
        let key = &self.schema.key;
        let pk = string_attr(item, &key.partition_attr).ok_or_else(|| {
            StoreError::Rejected(format!("item is missing key attribute '{}'", key.partition_attr))
        })?;
        let sk = string_attr(item, &key.sort_attr).ok_or_else(|| {
            StoreError::Rejected(format!("item is missing key attribute '{}'", key.sort_attr))
        })?;
        Ok((pk.to_string(), sk.to_string()))
    }

    fn put(&self, item: &Item) -> Result<(), StoreError> {
        let (pk, sk) = self.primary_key(item)?;
        let previous = self.primary.insert(item, &pk, &sk);

        for index in self.secondary.values() {
            if let Some(previous) = &previous {
                index.remove(previous, &pk, &sk);
            }
            index.insert(item, &pk, &sk);
        }
        Ok(())
    }
}

/// Thread-safe in-memory `TableStore`.
pub struct MemoryStore {
    tables: DashMap<String, Arc<MemoryTable>>,
    activation_delay: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_activation_delay(Duration::ZERO)
    }

    /// New tables report `Creating` until `delay` has elapsed.
    pub fn with_activation_delay(delay: Duration) -> Self {
        Self {
            tables: DashMap::new(),
            activation_delay: delay,
        }
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    fn table(&self, name: &str) -> Result<Arc<MemoryTable>, StoreError> {
        self.tables
            .get(name)
            .map(|table| table.value().clone())
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn describe_table(&self, name: &str) -> Result<TableDescription, StoreError> {
        Ok(self.table(name)?.describe())
    }

    async fn create_table(&self, schema: TableSchema) -> Result<TableDescription, StoreError> {
        if schema.name.is_empty() {
            return Err(StoreError::Rejected("table name must not be empty".into()));
        }
        let mut names: Vec<&str> = schema.indexes.iter().map(|i| i.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(StoreError::Rejected("duplicate secondary index name".into()));
        }

        match self.tables.entry(schema.name.clone()) {
            Entry::Occupied(_) => Err(StoreError::TableAlreadyExists(schema.name)),
            Entry::Vacant(slot) => {
                tracing::info!(
                    "Creating table {} with {} secondary indexes",
                    schema.name,
                    schema.indexes.len()
                );
                let table = Arc::new(MemoryTable::new(schema, self.activation_delay));
                let description = table.describe();
                slot.insert(table);
                Ok(description)
            }
        }
    }

    async fn batch_write(&self, table: &str, items: &[Item]) -> Result<(), StoreError> {
        if items.len() > MAX_BATCH_ITEMS {
            return Err(StoreError::Rejected(format!(
                "batch of {} items exceeds the limit of {}",
                items.len(),
                MAX_BATCH_ITEMS
            )));
        }
        let table = self.table(table)?;
        table.ensure_active()?;

        // Validate the whole batch before applying any of it.
        for item in items {
            table.primary_key(item)?;
        }
        for item in items {
            table.put(item)?;
        }
        tracing::debug!("Wrote {} items to {}", items.len(), table.schema.name);
        Ok(())
    }

    async fn query(&self, request: &QueryRequest) -> Result<Vec<Item>, StoreError> {
        let table = self.table(&request.table)?;
        table.ensure_active()?;

        let index = match &request.index {
            None => &table.primary,
            Some(name) => table
                .secondary
                .get(name)
                .ok_or_else(|| StoreError::IndexNotFound {
                    table: request.table.clone(),
                    index: name.clone(),
                })?,
        };

        Ok(index.query(
            &request.partition,
            request.sort.as_ref(),
            request.forward,
            request.limit,
        ))
    }
}
