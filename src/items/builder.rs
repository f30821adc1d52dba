use super::keys::*;
use super::types::{CommonPayload, FanOut, IndexItem, IndexKeys, ItemKind};
use crate::document::types::Paper;
use crate::keywords::tokenizer::normalize_term;

use std::collections::HashSet;

/// Builds every index item for `paper`.
///
/// The paper item is always emitted. Category, author and keyword items are emitted once per
/// distinct key, so repeated categories or authors differing only in case/whitespace collapse
/// into one row. Output order is paper, categories, authors, keywords, each in input order.
pub fn build_items(paper: &Paper, keywords: &[String]) -> FanOut {
    let payload = CommonPayload {
        arxiv_id: paper.arxiv_id.clone(),
        title: paper.title.clone(),
        authors: paper.authors.clone(),
        categories: paper.categories.clone(),
        published: paper.published.clone(),
    };
    let sort_key = date_sort_key(&paper.published, &paper.arxiv_id);

    let mut fan_out = FanOut::default();
    let mut seen: HashSet<String> = HashSet::new();

    let primary_key = paper_key(&paper.arxiv_id);
    push(
        &mut fan_out,
        IndexItem {
            kind: ItemKind::PaperId,
            pk: primary_key.clone(),
            sk: PAPER_SORT_KEY.to_string(),
            gsi1: None,
            gsi2: Some(IndexKeys {
                partition: primary_key,
                sort: paper.published.clone(),
            }),
            gsi3: None,
            payload: payload.clone(),
            abstract_text: Some(paper.abstract_text.clone()),
        },
    );

    for category in &paper.categories {
        let pk = category_key(category);
        if !seen.insert(pk.clone()) {
            continue;
        }
        push(
            &mut fan_out,
            IndexItem {
                kind: ItemKind::Category,
                pk,
                sk: sort_key.clone(),
                gsi1: None,
                gsi2: None,
                gsi3: None,
                payload: payload.clone(),
                abstract_text: None,
            },
        );
    }

    for author in &paper.authors {
        let pk = author_key(author);
        if !seen.insert(pk.clone()) {
            continue;
        }
        push(
            &mut fan_out,
            IndexItem {
                kind: ItemKind::Author,
                pk: pk.clone(),
                sk: sort_key.clone(),
                gsi1: Some(IndexKeys {
                    partition: pk,
                    sort: sort_key.clone(),
                }),
                gsi2: None,
                gsi3: None,
                payload: payload.clone(),
                abstract_text: None,
            },
        );
    }

    for keyword in keywords {
        if normalize_term(keyword).is_empty() {
            continue;
        }
        let pk = keyword_key(keyword);
        if !seen.insert(pk.clone()) {
            continue;
        }
        push(
            &mut fan_out,
            IndexItem {
                kind: ItemKind::Keyword,
                pk: pk.clone(),
                sk: sort_key.clone(),
                gsi1: None,
                gsi2: None,
                gsi3: Some(IndexKeys {
                    partition: pk,
                    sort: sort_key.clone(),
                }),
                payload: payload.clone(),
                abstract_text: None,
            },
        );
    }

    fan_out
}

fn push(fan_out: &mut FanOut, item: IndexItem) {
    fan_out.counts.record(item.kind);
    fan_out.items.push(item);
}
