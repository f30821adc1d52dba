use super::keys::*;
use crate::storage::types::Item;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    PaperId,
    Category,
    Author,
    Keyword,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Category,
        ItemKind::Author,
        ItemKind::Keyword,
        ItemKind::PaperId,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::PaperId => "paper_id",
            ItemKind::Category => "category",
            ItemKind::Author => "author",
            ItemKind::Keyword => "keyword",
        }
    }
}

/// Item counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub paper_id: usize,
    pub category: usize,
    pub author: usize,
    pub keyword: usize,
}

impl KindCounts {
    pub fn record(&mut self, kind: ItemKind) {
        *self.slot(kind) += 1;
    }

    pub fn get(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::PaperId => self.paper_id,
            ItemKind::Category => self.category,
            ItemKind::Author => self.author,
            ItemKind::Keyword => self.keyword,
        }
    }

    pub fn total(&self) -> usize {
        self.paper_id + self.category + self.author + self.keyword
    }

    pub fn merge(&mut self, other: &KindCounts) {
        for kind in ItemKind::ALL {
            *self.slot(kind) += other.get(kind);
        }
    }

    fn slot(&mut self, kind: ItemKind) -> &mut usize {
        match kind {
            ItemKind::PaperId => &mut self.paper_id,
            ItemKind::Category => &mut self.category,
            ItemKind::Author => &mut self.author,
            ItemKind::Keyword => &mut self.keyword,
        }
    }
}

/// Secondary-index key pair carried by an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexKeys {
    pub partition: String,
    pub sort: String,
}

/// Fields copied onto every item so each access pattern is answered without a second lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonPayload {
    pub arxiv_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    pub published: String,
}

/// One denormalized row: a (document, access pattern) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexItem {
    pub kind: ItemKind,
    pub pk: String,
    pub sk: String,
    /// `AuthorIndex` keys.
    pub gsi1: Option<IndexKeys>,
    /// `PaperIdIndex` keys.
    pub gsi2: Option<IndexKeys>,
    /// `KeywordIndex` keys.
    pub gsi3: Option<IndexKeys>,
    pub payload: CommonPayload,
    /// Only the paper item carries the abstract.
    pub abstract_text: Option<String>,
}

impl IndexItem {
    /// Renders the item as a store attribute map.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(ATTR_PK.to_string(), Value::from(self.pk.as_str()));
        item.insert(ATTR_SK.to_string(), Value::from(self.sk.as_str()));

        let secondary = [
            (ATTR_GSI1PK, ATTR_GSI1SK, &self.gsi1),
            (ATTR_GSI2PK, ATTR_GSI2SK, &self.gsi2),
            (ATTR_GSI3PK, ATTR_GSI3SK, &self.gsi3),
        ];
        for (pk_attr, sk_attr, keys) in secondary {
            if let Some(keys) = keys {
                item.insert(pk_attr.to_string(), Value::from(keys.partition.as_str()));
                item.insert(sk_attr.to_string(), Value::from(keys.sort.as_str()));
            }
        }

        item.insert("arxiv_id".into(), Value::from(self.payload.arxiv_id.as_str()));
        item.insert("title".into(), Value::from(self.payload.title.as_str()));
        item.insert("authors".into(), Value::from(self.payload.authors.clone()));
        item.insert(
            "categories".into(),
            Value::from(self.payload.categories.clone()),
        );
        item.insert("published".into(), Value::from(self.payload.published.as_str()));

        if let Some(abstract_text) = &self.abstract_text {
            item.insert("abstract".into(), Value::from(abstract_text.as_str()));
        }

        item
    }
}

/// The result of fanning out one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOut {
    pub items: Vec<IndexItem>,
    pub counts: KindCounts,
}
