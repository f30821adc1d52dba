use super::types::{PaperDetail, PaperQuery, PaperSummary, QueryError, QueryOutcome, QueryResults};
use crate::items::keys::{
    AUTHOR_INDEX, KEYWORD_INDEX, PAPER_ID_INDEX, author_key, category_key, date_range_bounds,
    keyword_key, paper_key,
};
use crate::storage::store::TableHandle;
use crate::storage::types::{Item, QueryRequest};

use std::time::Instant;

/// Read side of the paper table. Every operation is a single index lookup.
#[derive(Debug, Clone)]
pub struct QueryLayer {
    table: TableHandle,
}

impl QueryLayer {
    pub fn new(table: TableHandle) -> Self {
        Self { table }
    }

    /// Newest `limit` papers of `category`.
    pub async fn recent_in_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<PaperSummary>, QueryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let request = self
            .table
            .query_partition(category_key(category))
            .descending()
            .limit(limit);
        self.summaries(request).await
    }

    /// Every paper by `name`, oldest first. Case and spacing of the name do not matter.
    pub async fn by_author(&self, name: &str) -> Result<Vec<PaperSummary>, QueryError> {
        let request = self
            .table
            .query_partition(author_key(name))
            .on_index(AUTHOR_INDEX);
        self.summaries(request).await
    }

    pub async fn by_id(&self, arxiv_id: &str) -> Result<Option<PaperDetail>, QueryError> {
        let request = self
            .table
            .query_partition(paper_key(arxiv_id))
            .on_index(PAPER_ID_INDEX)
            .limit(1);
        let items = self.lookup(request).await?;
        Ok(items.first().map(PaperDetail::from_item))
    }

    /// Papers of `category` dated `start..=end`, oldest first.
    pub async fn date_range(
        &self,
        category: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<PaperSummary>, QueryError> {
        let (low, high) = date_range_bounds(start, end);
        let request = self
            .table
            .query_partition(category_key(category))
            .range(low, high);
        self.summaries(request).await
    }

    /// Newest `limit` papers carrying `keyword`.
    pub async fn by_keyword(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<PaperSummary>, QueryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let request = self
            .table
            .query_partition(keyword_key(keyword))
            .on_index(KEYWORD_INDEX)
            .descending()
            .limit(limit);
        self.summaries(request).await
    }

    pub async fn execute(&self, query: &PaperQuery) -> Result<QueryOutcome, QueryError> {
        let started = Instant::now();

        let results = match query {
            PaperQuery::Recent { category, limit } => {
                QueryResults::Papers(self.recent_in_category(category, *limit).await?)
            }
            PaperQuery::ByAuthor { name } => QueryResults::Papers(self.by_author(name).await?),
            PaperQuery::ById { id } => {
                QueryResults::Details(self.by_id(id).await?.into_iter().collect())
            }
            PaperQuery::DateRange {
                category,
                start,
                end,
            } => QueryResults::Papers(self.date_range(category, start, end).await?),
            PaperQuery::ByKeyword { keyword, limit } => {
                QueryResults::Papers(self.by_keyword(keyword, *limit).await?)
            }
        };

        let elapsed = started.elapsed();
        tracing::debug!(
            "{} returned {} result(s) in {:?}",
            query.query_type(),
            results.len(),
            elapsed
        );

        Ok(QueryOutcome {
            query_type: query.query_type(),
            parameters: query.parameters(),
            count: results.len(),
            results,
            execution_time_ms: elapsed.as_millis() as u64,
        })
    }

    async fn summaries(&self, request: QueryRequest) -> Result<Vec<PaperSummary>, QueryError> {
        let items = self.lookup(request).await?;
        Ok(items.iter().map(PaperSummary::from_item).collect())
    }

    /// A missing table reads as empty; any other store failure is surfaced.
    async fn lookup(&self, request: QueryRequest) -> Result<Vec<Item>, QueryError> {
        match self.table.query(&request).await {
            Ok(items) => Ok(items),
            Err(e) if e.is_not_found() => {
                tracing::debug!("Table {} not found, returning no results", self.table.name());
                Ok(Vec::new())
            }
            Err(source) => Err(QueryError::Store {
                table: self.table.name().to_string(),
                source,
            }),
        }
    }
}
